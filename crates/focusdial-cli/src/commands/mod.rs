pub mod config;
pub mod dial;
pub mod stats;
pub mod tag;
pub mod timer;

use serde::Serialize;

pub(crate) fn print_json<T>(value: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: Serialize + ?Sized,
{
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
