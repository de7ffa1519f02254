use itertools::Itertools;

use super::prelude::*;
use crate::error;
use crate::error::*;
use crate::match_object;

/**
Builds a dragonfly topology, this is, a hierarchical topology where each group is fully-connected (a complete graph) and each pair of groups is connected by a single global link.

Router `pack((local,group)) = group*routers_per_group + local`. Every local link and every global link is emitted twice, once per direction:
the forward direction leaves through `East` and enters through `West`, the reverse direction leaves through `West` and enters through `East`.

The global link between groups `i<j` goes from the router `(j-1)%routers_per_group` of group `i` to the router `i%routers_per_group` of group `j`.
With few routers per group some routers hold several global links.

Example configuration:
```ignore
DragonFly{
	/// Number of groups. Denoted by `g` in Dally's paper.
	num_groups: 4,
	/// Number of routers in a group. Dally called it `a`. There are a-1 local links from each router.
	routers_per_group: 4,
	/// Latency of all links, including the ones to the terminals. Defaults to 1.
	link_latency: 1,
	/// Latency of the routers. Defaults to 1.
	router_latency: 1,
}
```
**/
#[derive(Debug,Clone)]
pub struct DragonFly
{
	/// Number of groups. Denoted by `g` in Dally's paper.
	num_groups: usize,
	/// Number of routers in a group. Dally called it `a`.
	routers_per_group: usize,
	link_latency: u64,
	router_latency: u64,
}

impl TopologyBuilder for DragonFly
{
	fn name(&self) -> &str
	{
		"DragonFly"
	}
	fn num_routers(&self) -> usize
	{
		self.num_groups * self.routers_per_group
	}
	fn link_latency(&self) -> u64
	{
		self.link_latency
	}
	fn router_latency(&self) -> u64
	{
		self.router_latency
	}
	fn add_internal_links(&self, context:&mut BuildContext) -> Result<(),Error>
	{
		let weight = 1;
		let local_pairs:Vec<(usize,usize)> = (0..self.routers_per_group).tuple_combinations().collect();
		for group in 0..self.num_groups
		{
			for &(x,y) in local_pairs.iter()
			{
				context.links.add_internal_link(self.pack((x,group)),self.pack((y,group)),Port::East,Port::West,self.link_latency,weight)?;
			}
		}
		for group in 0..self.num_groups
		{
			for &(x,y) in local_pairs.iter()
			{
				context.links.add_internal_link(self.pack((y,group)),self.pack((x,group)),Port::West,Port::East,self.link_latency,weight)?;
			}
		}
		let local_links = context.links.int_links().len();
		let group_pairs:Vec<(usize,usize)> = (0..self.num_groups).tuple_combinations().collect();
		for &(i,j) in group_pairs.iter()
		{
			let (src,dst) = self.global_link(i,j);
			context.links.add_internal_link(src,dst,Port::East,Port::West,self.link_latency,weight)?;
		}
		for &(i,j) in group_pairs.iter()
		{
			let (src,dst) = self.global_link(i,j);
			context.links.add_internal_link(dst,src,Port::West,Port::East,self.link_latency,weight)?;
		}
		log::debug!("DragonFly: {} local links and {} global links",local_links,context.links.int_links().len()-local_links);
		Ok(())
	}
}

impl DragonFly
{
	pub fn new(arg:TopologyBuilderArgument) -> Result<DragonFly,Error>
	{
		let mut num_groups=None;
		let mut routers_per_group=None;
		let mut link_latency=1;
		let mut router_latency=1;
		match_object!(arg.cv,["DragonFly","Dragonfly"],value,
			"num_groups" | "number_of_groups" => num_groups=Some(value.as_usize()?),
			"routers_per_group" | "num_routers_per_group" | "group_size" => routers_per_group=Some(value.as_usize()?),
			"link_latency" => link_latency=value.as_u64()?,
			"router_latency" => router_latency=value.as_u64()?,
		);
		let num_groups=num_groups.ok_or_else(||arg.cv.ill("There were no num_groups"))?;
		let routers_per_group=routers_per_group.ok_or_else(||arg.cv.ill("There were no routers_per_group"))?;
		DragonFly::with_parameters(num_groups,routers_per_group,link_latency,router_latency)
	}
	pub fn with_parameters(num_groups:usize, routers_per_group:usize, link_latency:u64, router_latency:u64) -> Result<DragonFly,Error>
	{
		if num_groups<1
		{
			return Err(error!(invalid_parameter).with_message(format!("num_groups={} must be positive",num_groups)));
		}
		if routers_per_group<1
		{
			return Err(error!(invalid_parameter).with_message(format!("routers_per_group={} must be positive",routers_per_group)));
		}
		if num_groups.checked_mul(routers_per_group).is_none()
		{
			return Err(error!(invalid_parameter).with_message(format!("{} groups of {} routers do not fit in the address space",num_groups,routers_per_group)));
		}
		if num_groups>1 && routers_per_group<num_groups-1
		{
			log::debug!("DragonFly with {} groups of {} routers: some routers carry several global links",num_groups,routers_per_group);
		}
		Ok(DragonFly{
			num_groups,
			routers_per_group,
			link_latency,
			router_latency,
		})
	}
	pub fn num_groups(&self) -> usize
	{
		self.num_groups
	}
	pub fn routers_per_group(&self) -> usize
	{
		self.routers_per_group
	}
	/**
	 Unpack a router index into `(local, group)` coordinates.
	 With `local` being the position of the router in the group and `group` the index of the group.
	**/
	pub fn unpack(&self, router_index: usize) -> (usize,usize)
	{
		(router_index%self.routers_per_group,router_index/self.routers_per_group)
	}
	/**
	 Pack coordinates `(local, group)` into a whole router index.
	**/
	pub fn pack(&self, coordinates:(usize,usize)) -> usize
	{
		coordinates.0+coordinates.1*self.routers_per_group
	}
	///The routers joined by the global link of the groups `i<j`, as `(router in i, router in j)`.
	pub fn global_link(&self, i:usize, j:usize) -> (usize,usize)
	{
		let src = self.pack(((j-1)%self.routers_per_group,i));
		let dst = self.pack((i%self.routers_per_group,j));
		(src,dst)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Plugs;
	use crate::config::ConfigurationValue;
	fn dragonfly_cv(num_groups:f64, routers_per_group:f64) -> ConfigurationValue
	{
		ConfigurationValue::Object("DragonFly".to_string(),vec![
			("num_groups".to_string(),ConfigurationValue::Number(num_groups)),
			("routers_per_group".to_string(),ConfigurationValue::Number(routers_per_group)),
		])
	}
	#[test]
	fn pack_unpack()
	{
		let dragonfly = DragonFly::with_parameters(5,3,1,1).unwrap();
		for router in 0..dragonfly.num_routers()
		{
			assert_eq!(dragonfly.pack(dragonfly.unpack(router)),router);
		}
		assert_eq!(dragonfly.unpack(7),(1,2));
	}
	#[test]
	fn router_count_must_fit()
	{
		assert!(DragonFly::with_parameters(usize::MAX/2+1,2,1,1).unwrap_err().is_invalid_parameter());
		assert!(DragonFly::with_parameters(2,usize::MAX/2+1,1,1).unwrap_err().is_invalid_parameter());
		let dragonfly = DragonFly::with_parameters(usize::MAX/2,2,1,1).unwrap();
		assert_eq!(dragonfly.num_routers(),usize::MAX-1);
	}
	#[test]
	fn global_links_join_the_right_groups()
	{
		let dragonfly = DragonFly::with_parameters(6,2,1,1).unwrap();
		for i in 0..6
		{
			for j in (i+1)..6
			{
				let (src,dst) = dragonfly.global_link(i,j);
				assert_eq!(dragonfly.unpack(src),((j-1)%2,i));
				assert_eq!(dragonfly.unpack(dst),(i%2,j));
			}
		}
	}
	#[test]
	fn configuration()
	{
		let plugs = Plugs::default();
		let cv = dragonfly_cv(3.0,4.0);
		let dragonfly = DragonFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap();
		assert_eq!(dragonfly.num_groups(),3);
		assert_eq!(dragonfly.routers_per_group(),4);
		assert_eq!(dragonfly.link_latency(),1);
		assert_eq!(dragonfly.router_latency(),1);
		let cv = dragonfly_cv(0.0,4.0);
		assert!(DragonFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap_err().is_invalid_parameter());
		let cv = dragonfly_cv(4294967296.0,4294967296.0);
		assert!(DragonFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap_err().is_invalid_parameter());
		let cv = ConfigurationValue::Object("DragonFly".to_string(),vec![
			("num_groups".to_string(),ConfigurationValue::Number(2.0)),
		]);
		assert!(DragonFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).is_err());
		let cv = ConfigurationValue::Object("DragonFly".to_string(),vec![
			("num_groups".to_string(),ConfigurationValue::Number(2.0)),
			("routers_per_group".to_string(),ConfigurationValue::Number(2.0)),
			("global_ports_per_router".to_string(),ConfigurationValue::Number(2.0)),
		]);
		assert!(DragonFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).is_err());
	}
	#[test]
	fn emission_order()
	{
		let dragonfly = DragonFly::with_parameters(2,2,1,1).unwrap();
		let topology = build_topology(&dragonfly,&[(),()]).unwrap();
		let summary:Vec<(usize,usize,usize,Port)> = topology.int_links().iter().map(|link|
			(link.link_id,link.src.router_index().unwrap(),link.dst.router_index().unwrap(),link.src_port.unwrap())
		).collect();
		assert_eq!(summary,vec![
			(2,0,1,Port::East),
			(3,2,3,Port::East),
			(4,1,0,Port::West),
			(5,3,2,Port::West),
			(6,0,2,Port::East),
			(7,2,0,Port::West),
		]);
	}
}
