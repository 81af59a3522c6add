// HTTP handlers, one module per resource.

pub mod lookup;
pub mod verify;
