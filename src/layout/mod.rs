mod connector;
mod group;
mod logic;
mod node;
mod row;
pub(crate) mod types;

pub use connector::{ConnectorKind, DiagramConnector};
pub use group::DiagramGroup;
pub use logic::DiagramLogic;
pub use node::DiagramNode;
pub use row::DiagramRow;
pub use types::*;
