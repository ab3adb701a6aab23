use crate::element::element_model::ElementInstance;
use crate::error::Result;

/// Where form content is loaded from and saved to.
///
/// Implementations must keep element order exactly as given.
pub trait FormRepository {
    fn load_document(&self, form_id: &str) -> Result<Vec<ElementInstance>>;

    fn save_document(&self, form_id: &str, elements: &[ElementInstance]) -> Result<()>;
}
