use itertools::iproduct;

use super::prelude::*;
use crate::error;
use crate::error::*;
use crate::match_object;

/**
The SlimFly is the MMS (McKay--Miller--Širáň) graph. For `prime=5` it is the Hoffman--Singleton graph, with 50 routers of degree 7 and diameter 2.

There are two sides of `q*q` routers, with `q` the prime. The router `(side,class,element)` has index `side*q*q + class*q + element`.
* Routers `(0,x,y)` and `(0,x,y')` are joined when `y-y'` is in the connection-offset set `X`.
* Routers `(1,m,c)` and `(1,m,c')` are joined when `c-c'` is in `Y`.
* Routers `(0,x,y)` and `(1,m,c)` are joined when `y = m*x + c`, that is, when the point lies on the line.

Links inside a side leave through `East` and enter through `West`, each ordered pair getting its own link.
Links between the sides go `North` to `South` from side 0 and `South` to `North` from side 1.

The sets `X` and `Y` must be closed under negation for the graph to be symmetric and regular. An asymmetric set is accepted with a warning.
When the sets are not given they are computed from a primitive element `ξ` of the field, with `X` the even powers and `Y` the odd powers of `ξ`.
This requires `prime%4==1`. For other primes give the sets explicitly.

Example configuration:
```ignore
SlimFly{
	prime: 13,
	//primitive: 2,//optional value, should actually be a primitive element. Computed when absent.
	//x_set: [1,3,4,9,10,12],//optional, together with y_set.
	//y_set: [2,5,6,7,8,11],
	link_latency: 1,
	router_latency: 1,
}
```
**/
#[derive(Debug,Clone)]
pub struct SlimFly
{
	prime: usize,
	/// Offsets inside side 0.
	x_set: Vec<usize>,
	/// Offsets inside side 1.
	y_set: Vec<usize>,
	link_latency: u64,
	router_latency: u64,
}

impl TopologyBuilder for SlimFly
{
	fn name(&self) -> &str
	{
		"SlimFly"
	}
	fn num_routers(&self) -> usize
	{
		2*self.prime*self.prime
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
		let q = self.prime;
		let weight = 1;
		let in_x = membership(&self.x_set,q);
		let in_y = membership(&self.y_set,q);
		for (x,y,y_prime) in iproduct!(0..q,0..q,0..q)
		{
			if in_x[(y+q-y_prime)%q]
			{
				context.links.add_internal_link(self.pack((0,x,y)),self.pack((0,x,y_prime)),Port::East,Port::West,self.link_latency,weight)?;
			}
		}
		let side_zero = context.links.int_links().len();
		for (m,c,c_prime) in iproduct!(0..q,0..q,0..q)
		{
			if in_y[(c+q-c_prime)%q]
			{
				context.links.add_internal_link(self.pack((1,m,c)),self.pack((1,m,c_prime)),Port::East,Port::West,self.link_latency,weight)?;
			}
		}
		let side_one = context.links.int_links().len() - side_zero;
		for (x,y,m) in iproduct!(0..q,0..q,0..q)
		{
			let c = (y + q - (m*x)%q) % q;
			let point = self.pack((0,x,y));
			let line = self.pack((1,m,c));
			context.links.add_internal_link(point,line,Port::North,Port::South,self.link_latency,weight)?;
			context.links.add_internal_link(line,point,Port::South,Port::North,self.link_latency,weight)?;
		}
		log::debug!("SlimFly q={}: {} links in side 0, {} links in side 1, {} links between sides",q,side_zero,side_one,2*q*q*q);
		Ok(())
	}
}

impl SlimFly
{
	pub fn new(arg:TopologyBuilderArgument) -> Result<SlimFly,Error>
	{
		let mut prime=5;
		let mut primitive=None;
		let mut x_set=None;
		let mut y_set=None;
		let mut link_latency=1;
		let mut router_latency=1;
		match_object!(arg.cv,"SlimFly",value,
			"prime" => prime=value.as_usize()?,
			"primitive" => primitive=Some(value.as_usize()?),
			"x_set" => x_set=Some(value.as_usize_array()?),
			"y_set" => y_set=Some(value.as_usize_array()?),
			"link_latency" => link_latency=value.as_u64()?,
			"router_latency" => router_latency=value.as_u64()?,
		);
		router_count(prime)?;
		let (x_set,y_set) = match (x_set,y_set)
		{
			(Some(x_set),Some(y_set)) =>
			{
				if primitive.is_some()
				{
					log::warn!("SlimFly: ignoring the primitive since the connection sets were given.");
				}
				(x_set,y_set)
			},
			(None,None) => mms_connection_sets(prime,primitive)?,
			_ => return Err(arg.cv.ill("x_set and y_set must be given together")),
		};
		SlimFly::with_sets(prime,x_set,y_set,link_latency,router_latency)
	}
	///The reference instance with 50 routers, `q=5`, `X={1,4}`, and `Y={2,3}`.
	pub fn reference(link_latency:u64, router_latency:u64) -> SlimFly
	{
		SlimFly{
			prime: 5,
			x_set: vec![1,4],
			y_set: vec![2,3],
			link_latency,
			router_latency,
		}
	}
	///Build with explicit connection-offset sets. Their elements are reduced modulo `prime`.
	pub fn with_sets(prime:usize, x_set:Vec<usize>, y_set:Vec<usize>, link_latency:u64, router_latency:u64) -> Result<SlimFly,Error>
	{
		if prime<2
		{
			return Err(error!(invalid_parameter).with_message(format!("prime={} must be at least 2",prime)));
		}
		router_count(prime)?;
		if !is_prime(prime)
		{
			log::warn!("SlimFly: {} is not a prime, the incidence between the sides is not that of a field.",prime);
		}
		let x_set = normalize_set(x_set,prime,"x_set")?;
		let y_set = normalize_set(y_set,prime,"y_set")?;
		for (name,set) in [("x_set",&x_set),("y_set",&y_set)].iter()
		{
			if !is_symmetric(set,prime)
			{
				log::warn!("SlimFly: {}={:?} is not closed under negation modulo {}. The links inside the side will not be balanced.",name,set,prime);
			}
		}
		Ok(SlimFly{
			prime,
			x_set,
			y_set,
			link_latency,
			router_latency,
		})
	}
	pub fn prime(&self) -> usize
	{
		self.prime
	}
	pub fn x_set(&self) -> &[usize]
	{
		&self.x_set
	}
	pub fn y_set(&self) -> &[usize]
	{
		&self.y_set
	}
	///Unpack a router index into `(side,class,element)`.
	pub fn unpack(&self, router_index:usize) -> (usize,usize,usize)
	{
		let q = self.prime;
		(router_index/(q*q),(router_index/q)%q,router_index%q)
	}
	///Pack `(side,class,element)` into a router index.
	pub fn pack(&self, coordinates:(usize,usize,usize)) -> usize
	{
		let q = self.prime;
		coordinates.0*q*q + coordinates.1*q + coordinates.2
	}
}

///The number of routers `2*prime*prime`, if it fits in a `usize`.
fn router_count(prime:usize) -> Result<usize,Error>
{
	prime.checked_mul(prime).and_then(|square|square.checked_mul(2))
		.ok_or_else(||error!(invalid_parameter).with_message(format!("a SlimFly with prime={} has more routers than can be indexed",prime)))
}

///A table with `table[r]` telling whether the residue `r` is in the set.
fn membership(set:&[usize], modulo:usize) -> Vec<bool>
{
	let mut table = vec![false;modulo];
	for &element in set
	{
		table[element%modulo] = true;
	}
	table
}

///Reduce modulo `prime`, sort, and remove repetitions. An offset of 0 would be a loop and is rejected.
fn normalize_set(set:Vec<usize>, prime:usize, name:&str) -> Result<Vec<usize>,Error>
{
	let mut set:Vec<usize> = set.into_iter().map(|element|element%prime).collect();
	set.sort_unstable();
	set.dedup();
	if set.first()==Some(&0)
	{
		return Err(error!(invalid_parameter).with_message(format!("{} contains 0 modulo {}, which would connect routers to themselves",name,prime)));
	}
	Ok(set)
}

///Whether `-s mod q` is in the set for every `s` in the set.
pub fn is_symmetric(set:&[usize], modulo:usize) -> bool
{
	let table = membership(set,modulo);
	set.iter().all(|&element|table[(modulo-element%modulo)%modulo])
}

pub fn is_prime(n:usize) -> bool
{
	if n<2
	{
		return false;
	}
	let mut divisor = 2;
	while divisor<=n/divisor
	{
		if n%divisor==0
		{
			return false;
		}
		divisor+=1;
	}
	true
}

///The least `k>0` with `element^k = 1 mod modulo`. `None` if there is none.
fn multiplicative_order(element:usize, modulo:usize) -> Option<usize>
{
	let element = element%modulo;
	if element==0
	{
		return None;
	}
	let mut power = element;
	for k in 1..modulo
	{
		if power==1
		{
			return Some(k);
		}
		power = (power*element)%modulo;
	}
	None
}

///The least primitive element of the field of `prime` elements.
pub fn find_primitive(prime:usize) -> Option<usize>
{
	(1..prime).find(|&candidate|multiplicative_order(candidate,prime)==Some(prime-1))
}

/**
The connection-offset sets of the MMS construction for a prime `q=4w+1`:
`X` contains the even powers of the primitive element and `Y` the odd powers. Both are returned sorted.
**/
pub fn mms_connection_sets(prime:usize, primitive:Option<usize>) -> Result<(Vec<usize>,Vec<usize>),Error>
{
	router_count(prime)?;
	if !is_prime(prime)
	{
		return Err(error!(invalid_parameter).with_message(format!("SlimFly sets can only be computed for primes, {} is not. Give x_set and y_set.",prime)));
	}
	if prime%4!=1
	{
		return Err(error!(invalid_parameter).with_message(format!("SlimFly sets are only computed for primes congruent to 1 modulo 4, got {}. Give x_set and y_set.",prime)));
	}
	let primitive = match primitive
	{
		Some(element) =>
		{
			if multiplicative_order(element,prime)!=Some(prime-1)
			{
				return Err(error!(invalid_parameter).with_message(format!("{} is not a primitive element modulo {}",element,prime)));
			}
			element%prime
		},
		None => find_primitive(prime).ok_or_else(||error!(undetermined).with_message(format!("could not find a primitive element modulo {}",prime)))?,
	};
	let mut x_set = vec![];
	let mut y_set = vec![];
	let mut power = 1;
	for exponent in 0..prime-1
	{
		if exponent%2==0 { x_set.push(power) } else { y_set.push(power) }
		power = (power*primitive)%prime;
	}
	x_set.sort_unstable();
	y_set.sort_unstable();
	Ok((x_set,y_set))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Plugs;
	use crate::config::ConfigurationValue;
	#[test]
	fn reference_sets()
	{
		assert_eq!(mms_connection_sets(5,None).unwrap(),(vec![1,4],vec![2,3]));
		assert_eq!(mms_connection_sets(5,Some(3)).unwrap(),(vec![1,4],vec![2,3]));
		assert_eq!(mms_connection_sets(13,None).unwrap(),(vec![1,3,4,9,10,12],vec![2,5,6,7,8,11]));
		assert!(mms_connection_sets(7,None).unwrap_err().is_invalid_parameter());
		assert!(mms_connection_sets(9,None).unwrap_err().is_invalid_parameter());
		assert!(mms_connection_sets(5,Some(4)).unwrap_err().is_invalid_parameter());
	}
	#[test]
	fn field_helpers()
	{
		assert_eq!(find_primitive(5),Some(2));
		assert_eq!(find_primitive(7),Some(3));
		assert_eq!(find_primitive(13),Some(2));
		assert!(is_prime(13));
		assert!(!is_prime(15));
		assert!(!is_prime(1));
		assert!(is_symmetric(&[1,4],5));
		assert!(!is_symmetric(&[1,2],5));
	}
	#[test]
	#[cfg(target_pointer_width="64")]
	fn router_count_must_fit()
	{
		let huge = usize::MAX/2;
		assert!(SlimFly::with_sets(huge,vec![1],vec![2],1,1).unwrap_err().is_invalid_parameter());
		assert!(mms_connection_sets(huge,None).is_err());
		let plugs = Plugs::default();
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![
			("prime".to_string(),ConfigurationValue::Number(4294967311.0)),
		]);
		assert!(SlimFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap_err().is_invalid_parameter());
		assert!(is_prime(4294967311));
		assert!(!is_prime(usize::MAX));
	}
	#[test]
	fn pack_unpack()
	{
		let slimfly = SlimFly::reference(1,1);
		assert_eq!(slimfly.num_routers(),50);
		for router in 0..50
		{
			assert_eq!(slimfly.pack(slimfly.unpack(router)),router);
		}
		assert_eq!(slimfly.pack((1,2,3)),38);
	}
	#[test]
	fn configuration()
	{
		let plugs = Plugs::default();
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![]);
		let slimfly = SlimFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap();
		assert_eq!(slimfly.prime(),5);
		assert_eq!(slimfly.x_set(),&[1,4]);
		assert_eq!(slimfly.y_set(),&[2,3]);
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![
			("prime".to_string(),ConfigurationValue::Number(7.0)),
			("x_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(1.0),ConfigurationValue::Number(13.0)])),
			("y_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(2.0),ConfigurationValue::Number(5.0)])),
		]);
		let slimfly = SlimFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap();
		assert_eq!(slimfly.x_set(),&[1,6]);
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![
			("x_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(1.0)])),
		]);
		assert!(SlimFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).is_err());
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![
			("x_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(0.0)])),
			("y_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(2.0)])),
		]);
		assert!(SlimFly::new(TopologyBuilderArgument{cv:&cv,plugs:&plugs}).unwrap_err().is_invalid_parameter());
	}
}
