use std::fmt::{self, Display, Formatter};

use crate::prelude::*;

use super::{TacBuilder, TacFunction};

/// The TAC of a translation unit: every function definition, in definition order.
#[derive(Debug, Default)]
pub struct TacProgram {
    functions: Vec<(String, TacFunction)>,
}
impl TacProgram {
    pub fn new() -> Self {
        Self { functions: vec![] }
    }

    /// Finish the instruction stream of the function `name` and add it to the program.
    pub fn define<S: Into<String>>(&mut self, name: S, body: TacBuilder) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            bail!("Internal compiler error! Function '{}' is defined twice", name);
        }

        let function = body
            .finish()
            .with_context(|| format!("Failed to finish function '{}'", name))?;
        debug!("Defined function {} ({} instructions)", name, function.len());
        self.functions.push((name, function));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TacFunction> {
        self.functions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, function)| function)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TacFunction)> {
        self.functions.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
impl Display for TacProgram {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (name, body) in self.iter() {
            writeln!(f, "function {}", name)?;
            write!(f, "{}", body)?;
        }
        Ok(())
    }
}
