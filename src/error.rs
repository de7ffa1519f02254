/*!

The error type returned by the fallible operations of the crate.

Errors should be built with the [`error!`](crate::error) macro, which records where in the source the error was created.
```ignore
return Err(error!(invalid_parameter).with_message(format!("num_groups={} must be positive",num_groups)));
```

*/

use std::fmt::{self,Display,Formatter};
use std::path::PathBuf;

use crate::config::ConfigurationValue;

///The place in the source code where an error was generated.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

impl Display for SourceLocation
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{}:{}:{}",self.file,self.line,self.column)
	}
}

///Build a [SourceLocation] for the current position in the source.
#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{
			file: file!(),
			line: line!(),
			column: column!(),
		}
	};
}

///Build an [Error] of the given kind, e.g., `error!(invalid_parameter)` or `error!(ill_formed_configuration,value.clone())`.
///The kind is the snake case name of one of the constructors of [Error].
#[macro_export]
macro_rules! error{
	($kind:ident) => {
		$crate::error::Error::$kind( $crate::source_location!() )
	};
	($kind:ident, $($args:expr),* ) => {
		$crate::error::Error::$kind( $crate::source_location!(), $($args),* )
	};
}

#[derive(Debug)]
pub enum ErrorKind
{
	///A count, index, or size outside of its valid range.
	InvalidParameter,
	///The internal links do not connect every router.
	DisconnectedTopology{
		components: usize,
	},
	///Links with bad ids, endpoints out of range, or missing ports.
	InconsistentTopology,
	///The configuration does not have the expected shape.
	IllFormedConfiguration(ConfigurationValue),
	///There is no builder for a topology of this name.
	UnknownTopology(String),
	CouldNotOpenFile(PathBuf,std::io::Error),
	CouldNotWriteFile(std::io::Error),
	///Some error without further classification.
	Undetermined,
}

#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{
			source_location,
			kind,
			message: None,
		}
	}
	///Append a message to the error. Previous messages are kept.
	pub fn with_message(mut self, new_message:String) -> Error
	{
		self.message = match self.message
		{
			Some(message) => Some(format!("{}\n{}",message,new_message)),
			None => Some(new_message),
		};
		self
	}
	pub fn invalid_parameter(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::InvalidParameter)
	}
	pub fn disconnected_topology(source_location:SourceLocation, components:usize) -> Error
	{
		Error::new(source_location,ErrorKind::DisconnectedTopology{components})
	}
	pub fn inconsistent_topology(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::InconsistentTopology)
	}
	pub fn ill_formed_configuration(source_location:SourceLocation, value:ConfigurationValue) -> Error
	{
		Error::new(source_location,ErrorKind::IllFormedConfiguration(value))
	}
	pub fn unknown_topology(source_location:SourceLocation, name:String) -> Error
	{
		Error::new(source_location,ErrorKind::UnknownTopology(name))
	}
	pub fn could_not_open_file(source_location:SourceLocation, path:PathBuf, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotOpenFile(path,error))
	}
	pub fn could_not_write_file(source_location:SourceLocation, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotWriteFile(error))
	}
	pub fn undetermined(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::Undetermined)
	}
	pub fn is_invalid_parameter(&self) -> bool
	{
		matches!(self.kind,ErrorKind::InvalidParameter)
	}
	pub fn is_disconnected_topology(&self) -> bool
	{
		matches!(self.kind,ErrorKind::DisconnectedTopology{..})
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		use ErrorKind::*;
		match self
		{
			InvalidParameter => write!(formatter,"InvalidParameter"),
			DisconnectedTopology{components} => write!(formatter,"DisconnectedTopology: the internal links form {} components",components),
			InconsistentTopology => write!(formatter,"InconsistentTopology"),
			IllFormedConfiguration(value) => write!(formatter,"IllFormedConfiguration: {}",value),
			UnknownTopology(name) => write!(formatter,"UnknownTopology: {}",name),
			CouldNotOpenFile(path,error) => write!(formatter,"CouldNotOpenFile: {:?} ({})",path,error),
			CouldNotWriteFile(error) => write!(formatter,"CouldNotWriteFile: {}",error),
			Undetermined => write!(formatter,"Undetermined"),
		}
	}
}

impl Display for Error
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{} at {}",self.kind,self.source_location)?;
		if let Some(message) = &self.message
		{
			write!(formatter,"\n{}",message)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error
{
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
	{
		match &self.kind
		{
			ErrorKind::CouldNotOpenFile(_,error) | ErrorKind::CouldNotWriteFile(error) => Some(error),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn messages_accumulate()
	{
		let error = error!(invalid_parameter).with_message("first".to_string()).with_message("second".to_string());
		assert!(error.is_invalid_parameter());
		assert_eq!(error.message.as_deref(), Some("first\nsecond"));
		let text = format!("{}",error);
		assert!(text.starts_with("InvalidParameter at "));
		assert!(text.contains("src/error.rs"));
	}
}
