//! Behavioural tests for pools and the registry against the headless host

mod pool_properties;
