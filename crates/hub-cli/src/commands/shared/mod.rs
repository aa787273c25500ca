pub mod audience;
pub mod limit;
pub mod parse;

use hub_core::enums::EntityType;
use hub_core::responses::DeleteResponse;

pub fn deleted(entity_type: EntityType, id: &str) -> DeleteResponse {
    DeleteResponse {
        entity_type,
        id: id.to_string(),
        deleted: true,
    }
}
