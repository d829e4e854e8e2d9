mod attribute;
mod id_symbolic_attribute;
mod numerical_attribute;
mod symbolic_attribute;

pub use attribute::Attribute;
pub use id_symbolic_attribute::IdSymbolicAttribute;
pub use numerical_attribute::NumericalAttribute;
pub use symbolic_attribute::SymbolicAttribute;
