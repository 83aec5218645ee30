#![allow(unused_imports)]

pub use anyhow::{anyhow, bail, Context, Result};
pub use log::{debug, error, info, trace, warn};
