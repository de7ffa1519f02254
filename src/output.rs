/*!

Textual dumps of a built topology.

* Format 0 lists the routers as `router_id,latency` and then every link as
`link_id,src,dst,src_port,dst_port,latency,weight,kind` sorted by `link_id`. Routers are written `r{i}`, terminals `t{i}`,
and a missing port is written `-`.
* Format 1 lists the adjacencies: `NODOS n`, `GRADO d` with `d` the maximum degree, and for each router `N i`
followed by a line with the neighbour routers of `i`, one per link.

*/

use std::fs::File;
use std::io::{BufWriter,Write};
use std::path::Path;

use crate::error;
use crate::error::*;
use crate::topology::{Topology,Port};

///Write the topology in the requested format. Unknown formats are an `InvalidParameter`.
pub fn write_topology<W:Write>(topology:&Topology, writer:&mut W, format:usize) -> Result<(),Error>
{
	let written = match format
	{
		0 => write_link_listing(topology,writer),
		1 => write_adjacencies(topology,writer),
		_ => return Err(error!(invalid_parameter).with_message(format!("unknown output format {}, use 0 for links or 1 for adjacencies",format))),
	};
	written.map_err(|e|error!(could_not_write_file,e))
}

///Create (or truncate) the file at `path` and write the topology into it.
pub fn write_topology_to_file(topology:&Topology, path:&Path, format:usize) -> Result<(),Error>
{
	let file = File::create(path).map_err(|e|error!(could_not_open_file,path.to_path_buf(),e))?;
	let mut writer = BufWriter::new(file);
	write_topology(topology,&mut writer,format)?;
	writer.flush().map_err(|e|error!(could_not_write_file,e))
}

fn port_text(port:Option<Port>) -> &'static str
{
	port.map(|p|p.name()).unwrap_or("-")
}

fn write_link_listing<W:Write>(topology:&Topology, writer:&mut W) -> Result<(),std::io::Error>
{
	for router in topology.routers()
	{
		writeln!(writer,"{},{}",router.id,router.latency)?;
	}
	let mut links:Vec<_> = topology.links().collect();
	links.sort_by_key(|link|link.link_id);
	for link in links
	{
		writeln!(writer,"{},{},{},{},{},{},{},{}",link.link_id,link.src,link.dst,port_text(link.src_port),port_text(link.dst_port),link.latency,link.weight,link.kind())?;
	}
	Ok(())
}

fn write_adjacencies<W:Write>(topology:&Topology, writer:&mut W) -> Result<(),std::io::Error>
{
	let n=topology.num_routers();
	writeln!(writer,"NODOS {}",n)?;
	writeln!(writer,"GRADO {}",topology.maximum_degree())?;
	for router_index in 0..n
	{
		writeln!(writer,"N {}",router_index)?;
		let neighbour_string=topology.neighbour_router_iter(router_index).map(|item|item.neighbour_router.to_string()).collect::<Vec<String>>().join(" ");
		writeln!(writer,"{}",neighbour_string)?;
	}
	Ok(())
}
