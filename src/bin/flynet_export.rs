use std::env;
use std::io::{self,Write};
use std::path::Path;

use flynet_lib::config::ConfigurationValue;
use flynet_lib::error::Error;
use flynet_lib::error;
use flynet_lib::output::{write_topology,write_topology_to_file};
use flynet_lib::registrar::AddressRangeRegistrar;
use flynet_lib::{Plugs,build_network,get_version_number};

fn options() -> getopts::Options
{
	let mut opts = getopts::Options::new();
	opts.optopt("t","topology","topology family to build","dragonfly|slimfly");
	opts.optopt("g","num-groups","number of DragonFly groups","NUMBER");
	opts.optopt("r","num-routers-per-group","number of routers in each DragonFly group","NUMBER");
	opts.optopt("q","prime","prime of the SlimFly field, 5 by default","NUMBER");
	opts.optopt("","link-latency","latency of every link, 1 by default","CYCLES");
	opts.optopt("","router-latency","latency of every router, 1 by default","CYCLES");
	opts.optopt("n","num-cpus","number of terminal nodes, one per router by default","NUMBER");
	opts.optopt("m","mem-size","memory to split among the nodes, such as 512MiB","SIZE");
	opts.optopt("f","format","0 for the link listing, 1 for the adjacencies","FORMAT");
	opts.optopt("o","output","file to write, standard output by default","FILE");
	opts.optflag("h","help","show this help");
	opts.optflag("V","version","show the version");
	opts
}

fn number_option(matches:&getopts::Matches, name:&str) -> Result<Option<f64>,Error>
{
	match matches.opt_str(name)
	{
		None => Ok(None),
		Some(text) => text.parse::<usize>().map(|x|Some(x as f64)).map_err(|_|error!(invalid_parameter).with_message(format!("--{} expects a non-negative integer, got `{}`",name,text))),
	}
}

fn topology_cv(matches:&getopts::Matches) -> Result<ConfigurationValue,Error>
{
	let family = matches.opt_str("topology").unwrap_or_else(||"dragonfly".to_string());
	let mut fields = vec![];
	let name = match family.to_lowercase().as_str()
	{
		"dragonfly" =>
		{
			let num_groups = number_option(matches,"num-groups")?.unwrap_or(4.0);
			let routers_per_group = number_option(matches,"num-routers-per-group")?.unwrap_or(4.0);
			fields.push(("num_groups".to_string(),ConfigurationValue::Number(num_groups)));
			fields.push(("routers_per_group".to_string(),ConfigurationValue::Number(routers_per_group)));
			"DragonFly"
		},
		"slimfly" =>
		{
			if let Some(prime) = number_option(matches,"prime")?
			{
				fields.push(("prime".to_string(),ConfigurationValue::Number(prime)));
			}
			"SlimFly"
		},
		_ => return Err(error!(unknown_topology,family)),
	};
	for (option,key) in [("link-latency","link_latency"),("router-latency","router_latency")].iter()
	{
		if let Some(latency) = number_option(matches,option)?
		{
			fields.push((key.to_string(),ConfigurationValue::Number(latency)));
		}
	}
	Ok(ConfigurationValue::Object(name.to_string(),fields))
}

fn run(args:&[String]) -> Result<(),Error>
{
	let opts = options();
	let matches = opts.parse(args.iter().skip(1)).map_err(|e|error!(invalid_parameter).with_message(e.to_string()))?;
	if matches.opt_present("help")
	{
		let brief = format!("Usage: {} [options]",args.get(0).map(|s|s.as_str()).unwrap_or("flynet-export"));
		print!("{}",opts.usage(&brief));
		return Ok(());
	}
	if matches.opt_present("version")
	{
		println!("flynet-export {}",get_version_number());
		return Ok(());
	}
	let plugs = Plugs::default();
	let topology = topology_cv(&matches)?;
	let builder = flynet_lib::topology::new_topology(flynet_lib::topology::TopologyBuilderArgument{cv:&topology,plugs:&plugs})?;
	let num_cpus = match number_option(&matches,"num-cpus")?
	{
		Some(n) => n as usize,
		None => builder.num_routers(),
	};
	let mut network_fields = vec![
		("topology".to_string(),topology),
		("num_cpus".to_string(),ConfigurationValue::Number(num_cpus as f64)),
	];
	if let Some(mem_size) = matches.opt_str("mem-size")
	{
		network_fields.push(("mem_size".to_string(),ConfigurationValue::Literal(mem_size)));
	}
	let network = ConfigurationValue::Object("Network".to_string(),network_fields);
	let nodes:Vec<usize> = (0..num_cpus).collect();
	let mut registrar = AddressRangeRegistrar::new();
	let built = build_network(&network,&plugs,&nodes,&mut registrar)?;
	for range in registrar.ranges()
	{
		log::debug!("node {} owns [{:#x},{:#x})",range.owner_index,range.start,range.end);
	}
	let format = number_option(&matches,"format")?.map(|f|f as usize).unwrap_or(0);
	match matches.opt_str("output")
	{
		Some(path) => write_topology_to_file(&built,Path::new(&path),format)?,
		None =>
		{
			let stdout = io::stdout();
			let mut handle = stdout.lock();
			write_topology(&built,&mut handle,format)?;
			handle.flush().map_err(|e|error!(could_not_write_file,e))?;
		},
	}
	Ok(())
}

fn main()
{
	env_logger::init();
	let args:Vec<String> = env::args().collect();
	if let Err(error) = run(&args)
	{
		eprintln!("{}",error);
		std::process::exit(1);
	}
}
