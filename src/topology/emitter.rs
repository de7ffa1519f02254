/*!

The pieces shared by every topology builder: the routers, the link id counter, and the placement of terminals.

A [BuildContext] lives for a single build. External links are added first and then the builder adds the internal links,
all of them taking ids from the same counter.

*/

use super::{Router,Link,Endpoint,Port,Topology};
use crate::error;
use crate::error::*;

///The routers of one topology, with ids `0..len`.
#[derive(Debug,Clone)]
pub struct RouterSet
{
	routers: Vec<Router>,
}

impl RouterSet
{
	///Create `count` routers with ids `0..count` in order, all with the same latency.
	pub fn create_routers(count:usize, latency:u64) -> Result<RouterSet,Error>
	{
		if count<1
		{
			return Err(error!(invalid_parameter).with_message("a topology needs at least one router".to_string()));
		}
		Ok(RouterSet{
			routers: (0..count).map(|id|Router{id,latency}).collect(),
		})
	}
	pub fn len(&self) -> usize
	{
		self.routers.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.routers.is_empty()
	}
	pub fn get(&self, index:usize) -> Option<&Router>
	{
		self.routers.get(index)
	}
	pub fn as_slice(&self) -> &[Router]
	{
		&self.routers
	}
}

/**
Allocates link ids and keeps the links of a build.
The counter starts at 0 and is shared between external and internal links; it is never reset.
**/
#[derive(Debug)]
pub struct LinkEmitter
{
	next_link_id: usize,
	num_routers: usize,
	num_terminals: usize,
	ext_links: Vec<Link>,
	int_links: Vec<Link>,
}

impl LinkEmitter
{
	pub fn new(num_routers:usize, num_terminals:usize) -> LinkEmitter
	{
		LinkEmitter{
			next_link_id: 0,
			num_routers,
			num_terminals,
			ext_links: vec![],
			int_links: vec![],
		}
	}
	fn next_link_id(&mut self) -> usize
	{
		let link_id = self.next_link_id;
		self.next_link_id += 1;
		link_id
	}
	///The number of ids given so far, which is the id of the next link.
	pub fn link_count(&self) -> usize
	{
		self.next_link_id
	}
	fn check_router(&self, router:usize) -> Result<(),Error>
	{
		if router<self.num_routers
		{
			Ok(())
		}
		else
		{
			Err(error!(invalid_parameter).with_message(format!("router {} is out of range, there are {} routers",router,self.num_routers)))
		}
	}
	///Attach a terminal to a router. Returns the id of the new link.
	pub fn add_external_link(&mut self, terminal:usize, router:usize, latency:u64) -> Result<usize,Error>
	{
		if terminal>=self.num_terminals
		{
			return Err(error!(invalid_parameter).with_message(format!("terminal {} is out of range, there are {} terminals",terminal,self.num_terminals)));
		}
		self.check_router(router)?;
		let link_id = self.next_link_id();
		self.ext_links.push(Link{
			link_id,
			src: Endpoint::Terminal(terminal),
			dst: Endpoint::Router(router),
			src_port: None,
			dst_port: None,
			latency,
			weight: 1,
		});
		Ok(link_id)
	}
	///Add a directed link between two routers. Returns the id of the new link.
	pub fn add_internal_link(&mut self, src_router:usize, dst_router:usize, src_port:Port, dst_port:Port, latency:u64, weight:u64) -> Result<usize,Error>
	{
		self.check_router(src_router)?;
		self.check_router(dst_router)?;
		let link_id = self.next_link_id();
		self.int_links.push(Link{
			link_id,
			src: Endpoint::Router(src_router),
			dst: Endpoint::Router(dst_router),
			src_port: Some(src_port),
			dst_port: Some(dst_port),
			latency,
			weight,
		});
		Ok(link_id)
	}
	pub fn ext_links(&self) -> &[Link]
	{
		&self.ext_links
	}
	pub fn int_links(&self) -> &[Link]
	{
		&self.int_links
	}
}

///Places terminals over routers.
pub struct TerminalMapper;

impl TerminalMapper
{
	///Terminal `i` goes to router `i % num_routers`. Several terminals share a router when there are more terminals than routers.
	pub fn assign<T>(nodes:&[T], num_routers:usize) -> Result<Vec<usize>,Error>
	{
		if num_routers<1
		{
			return Err(error!(invalid_parameter).with_message("cannot place terminals without routers".to_string()));
		}
		if nodes.is_empty()
		{
			return Err(error!(invalid_parameter).with_message("there are no terminal nodes to place".to_string()));
		}
		Ok( (0..nodes.len()).map(|terminal_index|terminal_index%num_routers).collect() )
	}
}

///The state of a build in progress.
#[derive(Debug)]
pub struct BuildContext
{
	pub routers: RouterSet,
	pub links: LinkEmitter,
}

impl BuildContext
{
	pub fn new(routers:RouterSet, num_terminals:usize) -> BuildContext
	{
		let links = LinkEmitter::new(routers.len(),num_terminals);
		BuildContext{
			routers,
			links,
		}
	}
	pub fn num_routers(&self) -> usize
	{
		self.routers.len()
	}
	///Consume the context into the final graph.
	pub fn finish(self) -> Topology
	{
		let BuildContext{routers,links} = self;
		Topology::new(routers.routers,links.ext_links,links.int_links,links.num_terminals)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn router_ids_in_order()
	{
		let routers = RouterSet::create_routers(4,3).unwrap();
		let ids:Vec<usize> = routers.as_slice().iter().map(|r|r.id).collect();
		assert_eq!(ids,vec![0,1,2,3]);
		assert!(routers.as_slice().iter().all(|r|r.latency==3));
		assert!(RouterSet::create_routers(0,1).unwrap_err().is_invalid_parameter());
	}
	#[test]
	fn ids_shared_between_phases()
	{
		let mut emitter = LinkEmitter::new(2,3);
		assert_eq!(emitter.add_external_link(0,0,1).unwrap(),0);
		assert_eq!(emitter.add_external_link(1,1,1).unwrap(),1);
		assert_eq!(emitter.add_internal_link(0,1,Port::East,Port::West,1,1).unwrap(),2);
		assert_eq!(emitter.add_external_link(2,0,1).unwrap(),3);
		assert_eq!(emitter.add_internal_link(1,0,Port::West,Port::East,1,1).unwrap(),4);
		assert_eq!(emitter.link_count(),5);
		assert_eq!(emitter.ext_links().len(),3);
		assert_eq!(emitter.int_links().len(),2);
	}
	#[test]
	fn out_of_range_links_do_not_take_ids()
	{
		let mut emitter = LinkEmitter::new(2,1);
		assert!(emitter.add_external_link(1,0,1).unwrap_err().is_invalid_parameter());
		assert!(emitter.add_external_link(0,2,1).unwrap_err().is_invalid_parameter());
		assert!(emitter.add_internal_link(0,5,Port::North,Port::South,1,1).unwrap_err().is_invalid_parameter());
		assert_eq!(emitter.link_count(),0);
	}
	#[test]
	fn round_robin_assignment()
	{
		let nodes = vec!["a";7];
		assert_eq!(TerminalMapper::assign(&nodes,3).unwrap(),vec![0,1,2,0,1,2,0]);
		assert_eq!(TerminalMapper::assign(&nodes,10).unwrap(),vec![0,1,2,3,4,5,6]);
		assert!(TerminalMapper::assign(&nodes,0).unwrap_err().is_invalid_parameter());
		let empty:Vec<u8> = vec![];
		assert!(TerminalMapper::assign(&empty,3).unwrap_err().is_invalid_parameter());
	}
}
