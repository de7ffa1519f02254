/*!

Registration of the terminal nodes in an external node registry.

After a topology is built every terminal node `i` in `0..num_cpus` is registered once, in ascending order, as the owner of
`mem_size / num_cpus` bytes. The registry is whatever implements [NodeRegistrar]; closures do.
[AddressRangeRegistrar] is a registry that lays the shares one after another in a single address space.

*/

use crate::error;
use crate::error::*;

///Receives the memory share of each terminal node.
pub trait NodeRegistrar
{
	fn register_node(&mut self, node_indices:&[usize], memory_share:u64, owner_index:usize);
}

impl<F> NodeRegistrar for F where F: FnMut(&[usize],u64,usize)
{
	fn register_node(&mut self, node_indices:&[usize], memory_share:u64, owner_index:usize)
	{
		self(node_indices,memory_share,owner_index)
	}
}

/**
Register `num_cpus` nodes, each owning `mem_size/num_cpus` bytes. The remainder of the division is not assigned.
Returns the share given to each node.
**/
pub fn register_nodes(registrar:&mut dyn NodeRegistrar, num_cpus:usize, mem_size:u64) -> Result<u64,Error>
{
	if num_cpus<1
	{
		return Err(error!(invalid_parameter).with_message(format!("num_cpus={} must be positive",num_cpus)));
	}
	let share = mem_size / num_cpus as u64;
	if share==0
	{
		log::warn!("{} bytes among {} cpus leaves every node without memory.",mem_size,num_cpus);
	}
	for node_index in 0..num_cpus
	{
		registrar.register_node(&[node_index],share,node_index);
	}
	log::debug!("registered {} nodes with {} bytes each",num_cpus,share);
	Ok(share)
}

///A contiguous piece of the address space, `[start,end)`.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct AddressRange
{
	pub node_indices: Vec<usize>,
	pub owner_index: usize,
	pub start: u64,
	pub end: u64,
}

impl AddressRange
{
	pub fn len(&self) -> u64
	{
		self.end - self.start
	}
	pub fn is_empty(&self) -> bool
	{
		self.start==self.end
	}
	pub fn contains(&self, address:u64) -> bool
	{
		self.start<=address && address<self.end
	}
}

///Assigns consecutive non-overlapping ranges in the order of registration.
#[derive(Debug,Clone,Default)]
pub struct AddressRangeRegistrar
{
	base: u64,
	next_address: u64,
	ranges: Vec<AddressRange>,
}

impl AddressRangeRegistrar
{
	pub fn new() -> AddressRangeRegistrar
	{
		AddressRangeRegistrar::default()
	}
	///The first range starts at `base` instead of 0.
	pub fn with_base(base:u64) -> AddressRangeRegistrar
	{
		AddressRangeRegistrar{
			base,
			next_address: base,
			ranges: vec![],
		}
	}
	pub fn ranges(&self) -> &[AddressRange]
	{
		&self.ranges
	}
	///The range owned by a given owner, if it was registered.
	pub fn range_of(&self, owner_index:usize) -> Option<&AddressRange>
	{
		self.ranges.iter().find(|range|range.owner_index==owner_index)
	}
	///The owner of the range holding `address`.
	pub fn owner_of(&self, address:u64) -> Option<usize>
	{
		self.ranges.iter().find(|range|range.contains(address)).map(|range|range.owner_index)
	}
	///Bytes assigned so far.
	pub fn assigned(&self) -> u64
	{
		self.next_address - self.base
	}
}

impl NodeRegistrar for AddressRangeRegistrar
{
	fn register_node(&mut self, node_indices:&[usize], memory_share:u64, owner_index:usize)
	{
		let start = self.next_address;
		let end = start.saturating_add(memory_share);
		if end-start<memory_share
		{
			log::warn!("the range of owner {} was truncated at the end of the address space",owner_index);
		}
		self.next_address = end;
		self.ranges.push(AddressRange{
			node_indices: node_indices.to_vec(),
			owner_index,
			start,
			end,
		});
	}
}
