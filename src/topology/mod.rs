/*!

A Topology is the static graph of routers, terminals, and the links joining them.

A [TopologyBuilder] knows how to wire the routers of one topology family. Builders are created from a configuration by
[`new_topology`](fn.new_topology.html) and the graph is produced by [`build_topology`](fn.build_topology.html), which
attaches the terminals, asks the builder for the internal links, and validates the result.

## DragonFly
Fully meshed groups with one global link between each pair of groups. See [DragonFly](dragonfly::DragonFly).
```ignore
DragonFly{
	num_groups: 4,
	routers_per_group: 4,
	link_latency: 1,
	router_latency: 1,
}
```

## SlimFly
The MMS graph over a prime field, built from two connection-offset sets. See [SlimFly](slimfly::SlimFly).
Without arguments it is the 50 routers graph over `q=5`.
```ignore
SlimFly{
	prime: 5,
	x_set: [1,4],
	y_set: [2,3],
	link_latency: 1,
	router_latency: 1,
}
```

*/

pub mod emitter;
pub mod dragonfly;
pub mod slimfly;

use std::collections::BTreeMap;
use std::fmt::{self,Display,Formatter};

use self::dragonfly::DragonFly;
use self::slimfly::SlimFly;
use self::emitter::{BuildContext,RouterSet,TerminalMapper};
use crate::config::ConfigurationValue;
use crate::error;
use crate::error::*;
use crate::matrix::Matrix;
use crate::Plugs;

/// Some things most uses of the topology module will use.
pub mod prelude
{
	pub use super::{Topology,TopologyBuilder,TopologyBuilderArgument,new_topology,build_topology,Endpoint,Port,Link,LinkKind,Router,NeighbourRouterIteratorItem};
	pub use super::emitter::{BuildContext,RouterSet,LinkEmitter,TerminalMapper};
}

///Named router ports. Internal links always go from a named outport to a named inport.
#[derive(Clone,Copy,Debug,Hash,Eq,PartialEq,Ord,PartialOrd)]
pub enum Port
{
	North,
	South,
	East,
	West,
}

impl Port
{
	///The port at the other side of a straight wire. North faces South and East faces West.
	pub fn opposite(self) -> Port
	{
		match self
		{
			Port::North => Port::South,
			Port::South => Port::North,
			Port::East => Port::West,
			Port::West => Port::East,
		}
	}
	pub fn name(self) -> &'static str
	{
		match self
		{
			Port::North => "North",
			Port::South => "South",
			Port::East => "East",
			Port::West => "West",
		}
	}
}

impl Display for Port
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{}",self.name())
	}
}

///One of the ends of a link.
#[derive(Clone,Copy,Debug,Hash,Eq,PartialEq,Ord,PartialOrd)]
pub enum Endpoint
{
	Router(usize),
	///A terminal, by its position in the list of nodes given to the build.
	Terminal(usize),
}

impl Endpoint
{
	pub fn router_index(&self) -> Option<usize>
	{
		match self
		{
			Endpoint::Router(index) => Some(*index),
			Endpoint::Terminal(_) => None,
		}
	}
	pub fn terminal_index(&self) -> Option<usize>
	{
		match self
		{
			Endpoint::Terminal(index) => Some(*index),
			Endpoint::Router(_) => None,
		}
	}
}

impl Display for Endpoint
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		match self
		{
			Endpoint::Router(index) => write!(formatter,"r{}",index),
			Endpoint::Terminal(index) => write!(formatter,"t{}",index),
		}
	}
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct Router
{
	pub id: usize,
	///Cycles spent at each hop through the router.
	pub latency: u64,
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum LinkKind
{
	///Between a terminal and its router.
	External,
	///Between two routers.
	Internal,
}

impl Display for LinkKind
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		match self
		{
			LinkKind::External => write!(formatter,"ext"),
			LinkKind::Internal => write!(formatter,"int"),
		}
	}
}

///A directed link. External links have no named ports; the router uses its default port.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Link
{
	pub link_id: usize,
	pub src: Endpoint,
	pub dst: Endpoint,
	pub src_port: Option<Port>,
	pub dst_port: Option<Port>,
	pub latency: u64,
	pub weight: u64,
}

impl Link
{
	pub fn kind(&self) -> LinkKind
	{
		match (self.src,self.dst)
		{
			(Endpoint::Router(_),Endpoint::Router(_)) => LinkKind::Internal,
			_ => LinkKind::External,
		}
	}
}

///Item for iterators of neighbour routers.
#[derive(Debug)]
pub struct NeighbourRouterIteratorItem
{
	///The internal link leaving the current router.
	pub link_id: usize,
	///Port of the current router that goes to the neighbour.
	pub port: Port,
	///The index of the neighbour router.
	pub neighbour_router: usize,
	///The port of the neighbour router at which the link arrives.
	pub neighbour_port: Port,
}

/**
The graph produced by a build. Links are kept sorted by `link_id`, external links before internal ones.
There is no way to modify it once built.
**/
#[derive(Debug,Clone)]
pub struct Topology
{
	routers: Vec<Router>,
	ext_links: Vec<Link>,
	int_links: Vec<Link>,
	num_terminals: usize,
	/// `outgoing[r]` are the positions in `int_links` of the links leaving router `r`.
	outgoing: Vec<Vec<usize>>,
	/// `incoming[r]` are the positions in `int_links` of the links reaching router `r`.
	incoming: Vec<Vec<usize>>,
}

impl Topology
{
	pub(crate) fn new(routers:Vec<Router>, ext_links:Vec<Link>, int_links:Vec<Link>, num_terminals:usize) -> Topology
	{
		let n = routers.len();
		let mut outgoing = vec![vec![];n];
		let mut incoming = vec![vec![];n];
		for (position,link) in int_links.iter().enumerate()
		{
			if let (Endpoint::Router(src),Endpoint::Router(dst)) = (link.src,link.dst)
			{
				if src<n && dst<n
				{
					outgoing[src].push(position);
					incoming[dst].push(position);
				}
			}
		}
		Topology{
			routers,
			ext_links,
			int_links,
			num_terminals,
			outgoing,
			incoming,
		}
	}
	pub fn routers(&self) -> &[Router]
	{
		&self.routers
	}
	pub fn ext_links(&self) -> &[Link]
	{
		&self.ext_links
	}
	pub fn int_links(&self) -> &[Link]
	{
		&self.int_links
	}
	///All the links in `link_id` order.
	pub fn links(&self) -> impl Iterator<Item=&Link>
	{
		self.ext_links.iter().chain(self.int_links.iter())
	}
	pub fn num_routers(&self) -> usize
	{
		self.routers.len()
	}
	pub fn num_terminals(&self) -> usize
	{
		self.num_terminals
	}
	pub fn num_links(&self) -> usize
	{
		self.ext_links.len() + self.int_links.len()
	}
	///The router to which the terminal is attached.
	pub fn terminal_router(&self, terminal_index:usize) -> Option<usize>
	{
		self.ext_links.iter().find(|link|link.src==Endpoint::Terminal(terminal_index)).and_then(|link|link.dst.router_index())
	}
	///Iterate over the internal links leaving a router.
	pub fn neighbour_router_iter<'a>(&'a self, router_index:usize) -> impl Iterator<Item=NeighbourRouterIteratorItem> + 'a
	{
		self.outgoing[router_index].iter().filter_map(move |&position|{
			let link = &self.int_links[position];
			match (link.dst,link.src_port,link.dst_port)
			{
				(Endpoint::Router(neighbour_router),Some(port),Some(neighbour_port)) => Some(NeighbourRouterIteratorItem{link_id:link.link_id,port,neighbour_router,neighbour_port}),
				_ => None,
			}
		})
	}
	///Number of internal links leaving the router. Parallel links are counted each time.
	pub fn degree(&self, router_index:usize) -> usize
	{
		self.outgoing[router_index].len()
	}
	///Number of internal links reaching the router.
	pub fn in_degree(&self, router_index:usize) -> usize
	{
		self.incoming[router_index].len()
	}
	pub fn maximum_degree(&self) -> usize
	{
		(0..self.num_routers()).map(|router_index|self.degree(router_index)).max().unwrap_or(0)
	}
	pub fn minimum_degree(&self) -> usize
	{
		(0..self.num_routers()).map(|router_index|self.degree(router_index)).min().unwrap_or(0)
	}
	///The distinct routers reached by the links leaving `router_index`, sorted.
	pub fn neighbours(&self, router_index:usize) -> Vec<usize>
	{
		let mut list:Vec<usize> = self.neighbour_router_iter(router_index).map(|item|item.neighbour_router).collect();
		list.sort_unstable();
		list.dedup();
		list
	}

	///Breadth First Search following the direction of the links to compute distances from a router to all others.
	///Unreachable routers get `usize::MAX`.
	pub fn bfs(&self, origin:usize) -> Vec<usize>
	{
		let n=self.num_routers();
		let mut distance=vec![<usize>::MAX;n];
		distance[origin]=0;
		let mut queue=vec![0;n];
		let mut queue_read_index=0;//Next to read
		let mut queue_write_index=1;//Next to write
		queue[0]=origin;
		while queue_read_index<queue_write_index
		{
			let best=queue[queue_read_index];
			queue_read_index+=1;
			let alt=distance[best]+1;
			for NeighbourRouterIteratorItem{neighbour_router,..} in self.neighbour_router_iter(best)
			{
				if alt<distance[neighbour_router]
				{
					distance[neighbour_router]=alt;
					queue[queue_write_index]=neighbour_router;
					queue_write_index+=1;
				}
			}
		}
		distance
	}

	pub fn compute_distance_matrix(&self) -> Matrix<usize>
	{
		let n=self.num_routers();
		let mut matrix=Matrix::constant(0,n,n);
		for i in 0..n
		{
			let d=self.bfs(i);
			for j in 0..n
			{
				*matrix.get_mut(i,j)=d[j];
			}
		}
		matrix
	}

	///The greatest distance between two routers. `None` when some router cannot reach another.
	pub fn diameter(&self) -> Option<usize>
	{
		let matrix = self.compute_distance_matrix();
		let maximum = matrix.outside_diagonal().cloned().max().unwrap_or(0);
		if maximum==<usize>::MAX { None } else { Some(maximum) }
	}

	/// Find the components of the graph of internal links, ignoring their direction.
	/// Returns vector `ret` with `ret[k]` containing the routers in the `k`-th component, sorted.
	pub fn components(&self) -> Vec<Vec<usize>>
	{
		let n=self.num_routers();
		let mut component_of=vec![<usize>::MAX;n];
		let mut r:Vec<Vec<usize>>=vec![];
		for start in 0..n
		{
			if component_of[start]!=<usize>::MAX
			{
				continue;
			}
			let rindex=r.len();
			component_of[start]=rindex;
			let mut members=vec![start];
			let mut read_index=0;
			while read_index<members.len()
			{
				let current=members[read_index];
				read_index+=1;
				let forward=self.outgoing[current].iter().filter_map(|&p|self.int_links[p].dst.router_index());
				let backward=self.incoming[current].iter().filter_map(|&p|self.int_links[p].src.router_index());
				for other in forward.chain(backward)
				{
					if component_of[other]==<usize>::MAX
					{
						component_of[other]=rindex;
						members.push(other);
					}
				}
			}
			members.sort_unstable();
			r.push(members);
		}
		r
	}

	///Check the structural invariants of the graph:
	/// * link ids are `0..num_links` in order, external links first,
	/// * every endpoint is in range,
	/// * external links go from a terminal to a router without named ports,
	/// * internal links join two routers through named ports.
	pub fn check_adjacency_consistency(&self) -> Result<(),Error>
	{
		let n=self.num_routers();
		for (index,router) in self.routers.iter().enumerate()
		{
			if router.id!=index
			{
				return Err(error!(inconsistent_topology).with_message(format!("router at position {} has id {}",index,router.id)));
			}
		}
		for (expected_id,link) in self.links().enumerate()
		{
			if link.link_id!=expected_id
			{
				return Err(error!(inconsistent_topology).with_message(format!("found link id {} where {} was expected",link.link_id,expected_id)));
			}
			for endpoint in [link.src,link.dst].iter()
			{
				let in_range = match endpoint
				{
					Endpoint::Router(index) => *index<n,
					Endpoint::Terminal(index) => *index<self.num_terminals,
				};
				if !in_range
				{
					return Err(error!(inconsistent_topology).with_message(format!("link {} references {} which is out of range",link.link_id,endpoint)));
				}
			}
		}
		for link in self.ext_links.iter()
		{
			match (link.src,link.dst,link.src_port,link.dst_port)
			{
				(Endpoint::Terminal(_),Endpoint::Router(_),None,None) => (),
				_ => return Err(error!(inconsistent_topology).with_message(format!("external link {} is not a plain terminal to router link",link.link_id))),
			}
		}
		for link in self.int_links.iter()
		{
			match (link.src,link.dst,link.src_port,link.dst_port)
			{
				(Endpoint::Router(_),Endpoint::Router(_),Some(_),Some(_)) => (),
				_ => return Err(error!(inconsistent_topology).with_message(format!("internal link {} does not join two routers through named ports",link.link_id))),
			}
		}
		Ok(())
	}

	///Report, as warnings, internal links without a link going back and routers whose links leaving and arriving differ in number.
	///Returns whether every link has its way back.
	///Different degrees among routers are normal in some families, such as DragonFly global links, and are only logged at debug level.
	pub fn check_regularity(&self) -> bool
	{
		let mut regular=true;
		let mut pending:BTreeMap<(usize,usize),isize>=BTreeMap::new();
		for link in self.int_links.iter()
		{
			if let (Endpoint::Router(src),Endpoint::Router(dst)) = (link.src,link.dst)
			{
				*pending.entry((src,dst)).or_insert(0)+=1;
				*pending.entry((dst,src)).or_insert(0)-=1;
			}
		}
		let unreturned=pending.values().filter(|&&count|count>0).count();
		if unreturned>0
		{
			log::warn!("{} router pairs have links in only one direction (or unbalanced parallel links).",unreturned);
			regular=false;
		}
		if !self.is_degree_regular()
		{
			log::debug!("router degrees range from {} to {}.",self.minimum_degree(),self.maximum_degree());
		}
		for router_index in 0..self.num_routers()
		{
			if self.degree(router_index)!=self.in_degree(router_index)
			{
				log::warn!("router {} has {} links leaving and {} arriving.",router_index,self.degree(router_index),self.in_degree(router_index));
				regular=false;
			}
		}
		regular
	}

	///Whether all routers have the same number of links leaving them.
	pub fn is_degree_regular(&self) -> bool
	{
		self.minimum_degree()==self.maximum_degree()
	}

	///Everything the users of the graph rely upon: structural consistency and connectivity.
	///Irregularities are only reported as warnings.
	pub fn validate(&self) -> Result<(),Error>
	{
		self.check_adjacency_consistency()?;
		let components = self.components();
		if components.len()>1
		{
			let sizes:Vec<usize>=components.iter().map(|c|c.len()).collect();
			return Err(error!(disconnected_topology,components.len()).with_message(format!("component sizes are {:?}",sizes)));
		}
		self.check_regularity();
		Ok(())
	}
}

///A TopologyBuilder computes the internal links of one topology family.
pub trait TopologyBuilder : std::fmt::Debug
{
	///Name of the topology family, as used in the configuration.
	fn name(&self) -> &str;
	fn num_routers(&self) -> usize;
	///Latency of every link, external links included.
	fn link_latency(&self) -> u64;
	///Latency of every router.
	fn router_latency(&self) -> u64;
	///Emit the router to router links. Terminals and their links have already been added to the context.
	fn add_internal_links(&self, context:&mut BuildContext) -> Result<(),Error>;
}

/**
Build the graph for the given builder and nodes.
Each node becomes a terminal attached by an external link to router `index % num_routers`. Then the builder emits the internal links.
The result is validated before being returned, so a disconnected parameter combination gives an error instead of a graph.
**/
pub fn build_topology<T>(builder:&dyn TopologyBuilder, nodes:&[T]) -> Result<Topology,Error>
{
	let num_routers=builder.num_routers();
	let routers=RouterSet::create_routers(num_routers,builder.router_latency())
		.map_err(|e|e.with_message(format!("building a {}",builder.name())))?;
	let assignment=TerminalMapper::assign(nodes,num_routers)?;
	let mut context=BuildContext::new(routers,nodes.len());
	for (terminal_index,&router_index) in assignment.iter().enumerate()
	{
		context.links.add_external_link(terminal_index,router_index,builder.link_latency())?;
	}
	log::debug!("{}: {} external links",builder.name(),context.links.ext_links().len());
	builder.add_internal_links(&mut context)?;
	let topology=context.finish();
	topology.validate().map_err(|e|e.with_message(format!("the {} built from {:?} is not valid",builder.name(),builder)))?;
	log::info!("built {} with {} routers, {} terminals, {} external links and {} internal links",
		builder.name(),topology.num_routers(),topology.num_terminals(),topology.ext_links().len(),topology.int_links().len());
	Ok(topology)
}

pub struct TopologyBuilderArgument<'a>
{
	///A ConfigurationValue::Object defining the topology.
	pub cv: &'a ConfigurationValue,
	///The user defined plugs. In case the topology needs to create elements.
	pub plugs: &'a Plugs,
}

/**
Build a topology builder from its configuration. The object name selects the family: `DragonFly` or `SlimFly`,
or any name registered in the plugs.
**/
pub fn new_topology(arg:TopologyBuilderArgument) -> Result<Box<dyn TopologyBuilder>,Error>
{
	if let &ConfigurationValue::Object(ref cv_name, ref _cv_pairs)=arg.cv
	{
		if let Some(builder) = arg.plugs.topologies.get(cv_name)
		{
			return builder(arg);
		}
		match cv_name.as_str()
		{
			"DragonFly" | "Dragonfly" => Ok(Box::new(DragonFly::new(arg)?)),
			"SlimFly" => Ok(Box::new(SlimFly::new(arg)?)),
			_ => Err(error!(unknown_topology,cv_name.to_string())),
		}
	}
	else
	{
		Err(arg.cv.ill("Trying to create a topology from a non-Object"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	fn internal(link_id:usize, src:usize, dst:usize, src_port:Port) -> Link
	{
		Link{
			link_id,
			src: Endpoint::Router(src),
			dst: Endpoint::Router(dst),
			src_port: Some(src_port),
			dst_port: Some(src_port.opposite()),
			latency: 1,
			weight: 1,
		}
	}
	fn routers(n:usize) -> Vec<Router>
	{
		(0..n).map(|id|Router{id,latency:1}).collect()
	}
	#[test]
	fn ring_analysis()
	{
		let n=5;
		let mut links=vec![];
		for i in 0..n
		{
			links.push(internal(links.len(),i,(i+1)%n,Port::East));
			links.push(internal(links.len(),(i+1)%n,i,Port::West));
		}
		let topology=Topology::new(routers(n),vec![],links,0);
		assert!(topology.validate().is_ok());
		assert!(topology.check_regularity());
		assert_eq!(topology.diameter(),Some(2));
		assert_eq!(topology.bfs(0),vec![0,1,2,2,1]);
		assert_eq!(topology.neighbours(0),vec![1,4]);
		assert_eq!(topology.components(),vec![vec![0,1,2,3,4]]);
	}
	#[test]
	fn disconnected_is_rejected()
	{
		let links=vec![
			internal(0,0,1,Port::East),
			internal(1,1,0,Port::West),
			internal(2,2,3,Port::East),
			internal(3,3,2,Port::West),
		];
		let topology=Topology::new(routers(4),vec![],links,0);
		assert_eq!(topology.components(),vec![vec![0,1],vec![2,3]]);
		assert_eq!(topology.diameter(),None);
		let error=topology.validate().unwrap_err();
		assert!(error.is_disconnected_topology());
	}
	#[test]
	fn one_way_links_still_connect()
	{
		let links=vec![
			internal(0,0,1,Port::East),
			internal(1,1,2,Port::East),
		];
		let topology=Topology::new(routers(3),vec![],links,0);
		assert_eq!(topology.components().len(),1);
		assert!(!topology.check_regularity());
		assert_eq!(topology.bfs(2),vec![<usize>::MAX,<usize>::MAX,0]);
		assert!(topology.validate().is_ok());
	}
	#[test]
	fn uneven_degrees_are_accepted()
	{
		let links=vec![
			internal(0,0,1,Port::East),
			internal(1,1,0,Port::West),
			internal(2,0,2,Port::East),
			internal(3,2,0,Port::West),
		];
		let topology=Topology::new(routers(3),vec![],links,0);
		assert!(topology.check_regularity());
		assert!(!topology.is_degree_regular());
		assert!(topology.validate().is_ok());
	}
	#[test]
	fn bad_link_ids_are_inconsistent()
	{
		let links=vec![
			internal(0,0,1,Port::East),
			internal(2,1,0,Port::West),
		];
		let topology=Topology::new(routers(2),vec![],links,0);
		assert!(topology.check_adjacency_consistency().is_err());
		let links=vec![
			internal(0,0,1,Port::East),
			internal(1,1,7,Port::West),
		];
		let topology=Topology::new(routers(2),vec![],links,0);
		assert!(topology.check_adjacency_consistency().is_err());
	}
	#[test]
	fn unknown_topology_name()
	{
		let plugs=Plugs::default();
		let cv=ConfigurationValue::Object("Torus".to_string(),vec![]);
		let error=new_topology(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap_err();
		assert!(matches!(error.kind,ErrorKind::UnknownTopology(ref name) if name=="Torus"));
		let error=new_topology(TopologyBuilderArgument{cv:&ConfigurationValue::Number(3.0),plugs:&plugs}).unwrap_err();
		assert!(matches!(error.kind,ErrorKind::IllFormedConfiguration(_)));
	}
}
