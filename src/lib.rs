/*!
flynet-lib
=====

This crate builds the static graph of low-diameter interconnection networks: routers, terminal nodes attached to them, and the
directed links between all of them. Two families are provided, the DragonFly and the SlimFly (the MMS graphs).

# Usage

This crate is `flynet-lib`. To use it add `flynet-lib` to your dependencies in your project's `Cargo.toml`.

```toml
[dependencies]
flynet-lib = "0.2"
```

# Public Interface

A topology is described by a [ConfigurationValue](config::ConfigurationValue) object, whose name selects the family.
[new_topology](topology::new_topology) turns it into a [TopologyBuilder](topology::TopologyBuilder) and
[build_topology](topology::build_topology) produces the validated [Topology](topology::Topology) for a list of terminal nodes.

Each terminal is attached to router `index % num_routers` and takes the first link ids. The links between routers follow, their
ids continuing the same counter. Every build is checked before being returned: ids contiguous, endpoints in range, ports named,
and a single connected component. Otherwise an [Error](error::Error) is returned.

[build_network] does all of that from a `Network` object and then registers the memory share of every node in a
[NodeRegistrar](registrar::NodeRegistrar).

```ignore
Network{
	topology: DragonFly{
		num_groups: 4,
		routers_per_group: 4,
		link_latency: 1,
		router_latency: 1,
	},
	num_cpus: 16,//defaults to the number of nodes
	mem_size: "512MiB",//bytes or a string with unit. Defaults to 512MiB.
}
```

The [output] module writes a built topology as text, and the `flynet-export` binary does it from the command line.

# Plugging

[build_network] and [new_topology](topology::new_topology) receive a `&Plugs` argument that may be used to provide new
topology families. A plugged name takes precedence over the ones provided by the crate.

*/

// --- crate attributes ---
// At clippy::style
	#![allow(clippy::needless_return)]
	#![allow(clippy::new_without_default)]
	#![allow(clippy::len_without_is_empty)]
	#![allow(clippy::needless_range_loop)]
	#![allow(clippy::match_ref_pats)]
	#![allow(clippy::tabs_in_doc_comments)]
// At clippy::complexity
	#![allow(clippy::type_complexity)]

pub mod error;
pub mod config;
pub mod matrix;
pub mod topology;
pub mod registrar;
pub mod output;

use std::collections::BTreeMap;
use std::fmt::Debug;

use config::ConfigurationValue;
use error::Error;
use registrar::NodeRegistrar;
use topology::{Topology,TopologyBuilder,TopologyBuilderArgument,new_topology,build_topology};

///The memory split among the nodes when `mem_size` is not given.
pub const DEFAULT_MEM_SIZE: u64 = 512<<20;

#[derive(Default)]
pub struct Plugs
{
	topologies: BTreeMap<String, fn(TopologyBuilderArgument) -> Result<Box<dyn TopologyBuilder>,Error> >,
}

impl Plugs
{
	pub fn add_topology(&mut self, key:String, builder:fn(TopologyBuilderArgument) -> Result<Box<dyn TopologyBuilder>,Error>)
	{
		self.topologies.insert(key,builder);
	}
}

impl Debug for Plugs
{
	fn fmt(&self,f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error>
	{
		write!(f,"{};",self.topologies.keys().map(|s|s.to_string()).collect::<Vec<String>>().join(","))
	}
}

/**
Build the topology of a `Network` object for the given nodes and register the memory of each cpu.
The registration happens only after the topology has been validated, so a failed build registers nothing.
**/
pub fn build_network<T>(cv:&ConfigurationValue, plugs:&Plugs, nodes:&[T], registrar:&mut dyn NodeRegistrar) -> Result<Topology,Error>
{
	let mut topology_cv=None;
	let mut num_cpus=None;
	let mut mem_size=DEFAULT_MEM_SIZE;
	match_object!(cv,"Network",value,
		"topology" => topology_cv=Some(value),
		"num_cpus" => num_cpus=Some(value.as_usize()?),
		"mem_size" => mem_size=value.as_memory_size()?,
	);
	let topology_cv=topology_cv.ok_or_else(||cv.ill("There were no topology"))?;
	let num_cpus=num_cpus.unwrap_or(nodes.len());
	if num_cpus<1
	{
		return Err(error!(invalid_parameter).with_message(format!("num_cpus={} must be positive",num_cpus)));
	}
	if num_cpus!=nodes.len()
	{
		log::warn!("registering {} cpus for {} terminal nodes",num_cpus,nodes.len());
	}
	let builder=new_topology(TopologyBuilderArgument{cv:topology_cv,plugs})?;
	let topology=build_topology(builder.as_ref(),nodes)?;
	registrar::register_nodes(registrar,num_cpus,mem_size)?;
	Ok(topology)
}

/// Get the number currently written in the Cargo.toml field `version`.
pub fn get_version_number() -> &'static str
{
	match option_env!("CARGO_PKG_VERSION")
	{
		Some( version ) => version,
		_ => "?",
	}
}
