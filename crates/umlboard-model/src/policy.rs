//! Confirmation port for de-abstracting entities with abstract methods

/// Decides whether an entity holding abstract methods may become concrete
///
/// Consulted only when an entity is asked to drop its abstract flag while
/// abstract methods remain. Accepting de-abstracts every method first;
/// declining forces the entity to stay abstract. A GUI host backs this
/// with a dialog; headless callers use one of the fixed policies.
pub trait ConfirmationPolicy {
    /// True to de-abstract the remaining methods, false to keep the entity abstract
    fn allow_deabstract(&self, entity_name: &str) -> bool;
}

/// Always de-abstracts remaining methods
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDeabstract;

impl ConfirmationPolicy for AcceptDeabstract {
    fn allow_deabstract(&self, _entity_name: &str) -> bool {
        true
    }
}

/// Always keeps the entity abstract
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineDeabstract;

impl ConfirmationPolicy for DeclineDeabstract {
    fn allow_deabstract(&self, _entity_name: &str) -> bool {
        false
    }
}
