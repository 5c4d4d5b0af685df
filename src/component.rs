use crate::context::ContextHandle;

/// State shared by every pipeline component: a display name and the owning
/// execution context.
///
/// The owner is fixed at construction and never reassigned afterwards. All
/// destructive operations on the component run on that context, which is what
/// the shared handle machinery relies on.
pub struct ComponentBase {
    name: String,
    owner: ContextHandle,
}

impl ComponentBase {
    pub fn new(owner: &ContextHandle) -> ComponentBase {
        ComponentBase {
            name: String::new(),
            owner: owner.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }

    pub fn owner(&self) -> &ContextHandle {
        &self.owner
    }
}

/// Base capability of every logging pipeline object: it can be named for
/// diagnostics and it belongs to exactly one execution context.
pub trait Component {
    fn component(&self) -> &ComponentBase;
    fn component_mut(&mut self) -> &mut ComponentBase;

    /// Display name, empty by default.
    fn name(&self) -> &str {
        self.component().name()
    }

    /// Renames the component. Configuration phase only.
    fn set_name(&mut self, name: &str) {
        self.component_mut().set_name(name);
    }

    /// The execution context this component belongs to.
    fn owner(&self) -> &ContextHandle {
        self.component().owner()
    }
}

impl<T: Component + ?Sized> Component for Box<T> {
    fn component(&self) -> &ComponentBase {
        (**self).component()
    }

    fn component_mut(&mut self) -> &mut ComponentBase {
        (**self).component_mut()
    }
}
