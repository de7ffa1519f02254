#![allow(dead_code)]
use std::collections::BTreeSet;
use flynet_lib::config::ConfigurationValue;
use flynet_lib::topology::{Topology, Endpoint};


pub fn init_logger()
{
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn create_dragonfly_topology(num_groups: f64, routers_per_group: f64) -> ConfigurationValue
{
    ConfigurationValue::Object("DragonFly".to_string(), vec![
        ("num_groups".to_string(), ConfigurationValue::Number(num_groups)),
        ("routers_per_group".to_string(), ConfigurationValue::Number(routers_per_group)),
        ("link_latency".to_string(), ConfigurationValue::Number(1.0)),
        ("router_latency".to_string(), ConfigurationValue::Number(1.0)),
    ])
}

pub fn create_slimfly_topology(prime: f64) -> ConfigurationValue
{
    ConfigurationValue::Object("SlimFly".to_string(), vec![
        ("prime".to_string(), ConfigurationValue::Number(prime)),
    ])
}

pub fn create_slimfly_with_sets(prime: f64, x_set: &[usize], y_set: &[usize]) -> ConfigurationValue
{
    let numbers = |set: &[usize]| ConfigurationValue::Array(set.iter().map(|&x| ConfigurationValue::Number(x as f64)).collect());
    ConfigurationValue::Object("SlimFly".to_string(), vec![
        ("prime".to_string(), ConfigurationValue::Number(prime)),
        ("x_set".to_string(), numbers(x_set)),
        ("y_set".to_string(), numbers(y_set)),
    ])
}

pub fn create_network(topology: ConfigurationValue, num_cpus: f64, mem_size: ConfigurationValue) -> ConfigurationValue
{
    ConfigurationValue::Object("Network".to_string(), vec![
        ("topology".to_string(), topology),
        ("num_cpus".to_string(), ConfigurationValue::Number(num_cpus)),
        ("mem_size".to_string(), mem_size),
    ])
}

/// The `(src, dst)` router pairs of the internal links, in link order.
pub fn router_pairs(topology: &Topology) -> Vec<(usize, usize)>
{
    topology.int_links().iter().map(|link| match (link.src, link.dst)
    {
        (Endpoint::Router(src), Endpoint::Router(dst)) => (src, dst),
        _ => panic!("internal link {} does not join routers", link.link_id),
    }).collect()
}

/// Asserts the ids of every link are distinct and are exactly `0..num_links`.
pub fn assert_contiguous_ids(topology: &Topology)
{
    let ids: BTreeSet<usize> = topology.links().map(|link| link.link_id).collect();
    assert_eq!(ids.len(), topology.num_links());
    assert_eq!(ids.into_iter().collect::<Vec<usize>>(), (0..topology.num_links()).collect::<Vec<usize>>());
}
