/*!

Configuration values and the helpers to read them.

A topology is described by a [ConfigurationValue::Object] whose name selects the builder and whose pairs are its parameters.
```ignore
Network{
	topology: DragonFly{ num_groups: 4, routers_per_group: 4, link_latency: 1, router_latency: 1 },
	num_cpus: 16,
	mem_size: "512MiB",
}
```

*/

use std::fmt::{self,Display,Formatter};

use crate::error;
use crate::error::*;

#[derive(Debug,Clone,PartialEq)]
pub enum ConfigurationValue
{
	Literal(String),
	Number(f64),
	Object(String,Vec<(String,ConfigurationValue)>),
	Array(Vec<ConfigurationValue>),
	True,
	False,
	None,
}

/// match arms against the keys of an object
/// first argument, `$cv:expr`, is the ConfigurationValue expected to be the object
/// second argument, `$name:literal` or `$names:expr`, is the name (or names) the Object may have.
/// third argument, `$valueid:ident`, is the variable name capturing the value in the object's elements
///    and can be used in the arms
/// the remaining arguments are the arms of the match.
/// The enclosing function must return `Result<_,Error>`.
#[macro_export]
macro_rules! match_object{
	($cv:expr, $name:literal, $valueid:ident, $($arm:tt)* ) => {{
		$crate::match_object!($cv,[$name],$valueid,$($arm)*)
	}};
	($cv:expr, $names:expr, $valueid:ident, $($arm:tt)* ) => {{
		if let &$crate::config::ConfigurationValue::Object(ref cv_name, ref cv_pairs) = $cv
		{
			if !$names.iter().any(|&x|x==cv_name)
			{
				return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Expected one of {:?} but got a `{}` object",$names,cv_name)));
			}
			for &(ref name,ref $valueid) in cv_pairs
			{
				match AsRef::<str>::as_ref(&name)
				{
					$( $arm )*
					"legend_name" => (),
					_ => return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Nothing to do with field {} in {}",name,$names.get(0).unwrap_or_else(||&"None")))),
				}
			}
		}
		else
		{
			return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Trying to create a {} from a non-Object",$names.get(0).unwrap_or_else(||&"None"))));
		}
	}};
}

impl ConfigurationValue
{
	pub fn as_f64(&self) -> Result<f64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_usize(&self) -> Result<usize,Error>
	{
		let x = self.as_f64()?;
		// Negative numbers would saturate to 0 in the cast.
		if x < 0.0 {
			return Err(error!(ill_formed_configuration, self.clone()).with_message(format!("{} is negative",x)));
		}
		let res =  x as usize;
		let y = res as f64;
		let tolerance = 1e-5;
		if x-y > tolerance || x-y < -tolerance {
			Err(error!(ill_formed_configuration, self.clone()).with_message(format!("{} is not an integer",x)))
		} else {
			Ok( res )
		}
	}
	pub fn as_u64(&self) -> Result<u64,Error>
	{
		self.as_usize().map(|x|x as u64)
	}
	pub fn as_array(&self) -> Result<&Vec<ConfigurationValue>,Error>
	{
		match self
		{
			&ConfigurationValue::Array(ref x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	///Read an array of non-negative integers.
	pub fn as_usize_array(&self) -> Result<Vec<usize>,Error>
	{
		self.as_array()?.iter().map(|v|v.as_usize()).collect()
	}
	/**
	Read a memory size in bytes. Either a plain number of bytes or a literal with a unit, as in `"512MiB"`.
	All multiples are binary; `kB` and `KiB` are both 1024 bytes.
	**/
	pub fn as_memory_size(&self) -> Result<u64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(_) => self.as_u64(),
			&ConfigurationValue::Literal(ref s) => parse_memory_size(s).ok_or_else(||self.ill("not a valid memory size")),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	/// Build a generic IllFormedConfiguration error from this ConfigurationValue.
	pub fn ill(&self,message:&str) -> Error
	{
		error!(ill_formed_configuration,self.clone()).with_message(message.to_string())
	}
}

/**
Parse strings such as `"1024"`, `"64kB"`, `"512MiB"`, or `"2GB"` into a number of bytes.
Returns `None` on unknown units or on overflow.
**/
pub fn parse_memory_size(text:&str) -> Option<u64>
{
	let text = text.trim();
	let split = text.find(|c:char|!c.is_ascii_digit()).unwrap_or(text.len());
	let (digits,unit) = text.split_at(split);
	let value:u64 = digits.parse().ok()?;
	let multiplier:u64 = match unit.trim()
	{
		"" | "B" => 1,
		"kB" | "KB" | "KiB" => 1<<10,
		"MB" | "MiB" => 1<<20,
		"GB" | "GiB" => 1<<30,
		"TB" | "TiB" => 1<<40,
		_ => return None,
	};
	value.checked_mul(multiplier)
}

impl Display for ConfigurationValue
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		match self
		{
			ConfigurationValue::Literal(s) => write!(formatter,"\"{}\"",s),
			ConfigurationValue::Number(x) => write!(formatter,"{}",x),
			ConfigurationValue::Object(name,pairs) =>
			{
				if pairs.is_empty()
				{
					return write!(formatter,"{}",name);
				}
				let inner = pairs.iter().map(|(key,value)|format!("{}: {}",key,value)).collect::<Vec<String>>().join(", ");
				write!(formatter,"{}{{{}}}",name,inner)
			},
			ConfigurationValue::Array(list) =>
			{
				let inner = list.iter().map(|value|value.to_string()).collect::<Vec<String>>().join(", ");
				write!(formatter,"[{}]",inner)
			},
			ConfigurationValue::True => write!(formatter,"true"),
			ConfigurationValue::False => write!(formatter,"false"),
			ConfigurationValue::None => write!(formatter,"None"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn usize_accessor()
	{
		assert_eq!(ConfigurationValue::Number(4.0).as_usize().unwrap(),4);
		assert!(ConfigurationValue::Number(4.5).as_usize().is_err());
		assert!(ConfigurationValue::Number(-1.0).as_usize().is_err());
		assert!(ConfigurationValue::Literal("4".to_string()).as_usize().is_err());
		assert_eq!(ConfigurationValue::Number(2.5).as_f64().unwrap(),2.5);
		assert!(ConfigurationValue::True.as_f64().is_err());
	}
	#[test]
	fn memory_sizes()
	{
		assert_eq!(parse_memory_size("1024"),Some(1024));
		assert_eq!(parse_memory_size("64kB"),Some(64*1024));
		assert_eq!(parse_memory_size("512MiB"),Some(512<<20));
		assert_eq!(parse_memory_size("2GB"),Some(2<<30));
		assert_eq!(parse_memory_size("3 parsecs"),None);
		assert_eq!(parse_memory_size("MB"),None);
		assert_eq!(ConfigurationValue::Literal("1KiB".to_string()).as_memory_size().unwrap(),1024);
		assert_eq!(ConfigurationValue::Number(256.0).as_memory_size().unwrap(),256);
	}
	#[test]
	fn display()
	{
		let cv = ConfigurationValue::Object("SlimFly".to_string(),vec![
			("prime".to_string(),ConfigurationValue::Number(5.0)),
			("x_set".to_string(),ConfigurationValue::Array(vec![ConfigurationValue::Number(1.0),ConfigurationValue::Number(4.0)])),
		]);
		assert_eq!(cv.to_string(),"SlimFly{prime: 5, x_set: [1, 4]}");
	}
}
