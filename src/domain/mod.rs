// Domain layer: board/list/card models, the persistence port, and the ordering rules
// shared by both order arrays. Nothing here touches a concrete store.

pub mod model;
pub mod ordering;
pub mod ports;
