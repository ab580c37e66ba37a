use crate::descriptor::ServiceDescriptor;
use crate::error::{BindingError, BindingErrorExt};
use crate::handler::{HandlerCatalog, ServiceHandler};
use crate::instance::ServiceInstance;
use bindery_xml::Element;
use std::sync::Arc;
use tracing::warn;

/// Turns a descriptor plus an instance payload into a ready handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerFactory<'a> {
    catalog: &'a HandlerCatalog,
}

impl<'a> HandlerFactory<'a> {
    #[must_use]
    pub const fn new(catalog: &'a HandlerCatalog) -> Self {
        Self { catalog }
    }

    /// Constructs a handler and lets it absorb `instance`, recording variables under `variables`.
    ///
    /// Returns `Ok(None)` when the descriptor does not name a module and a handler; the instance
    /// then produces no binding.
    ///
    /// # Errors
    /// * [`BindingError::UnknownHandler`] if the catalog has no constructor for the named pair.
    /// * [`BindingError::HandlerConstruction`] if the handler rejects the payload.
    pub fn instantiate(
        &self,
        descriptor: &Arc<ServiceDescriptor>,
        instance: &ServiceInstance,
        variables: &mut Element,
    ) -> Result<Option<Box<dyn ServiceHandler>>, BindingError> {
        let (Some(module), Some(handler)) = (descriptor.module(), descriptor.handler()) else {
            warn!(
                type_key = descriptor.type_key(),
                instance = instance.name().unwrap_or_default(),
                "Descriptor does not name a handler, skipping instance"
            );
            return Ok(None);
        };

        let constructor =
            self.catalog.get(module, handler).ok_or_else(|| BindingError::UnknownHandler {
                message: format!("{module}::{handler}").into(),
                context: Some(format!("type '{}'", descriptor.type_key()).into()),
            })?;

        let mut built = constructor(descriptor);
        built.absorb(instance, variables).context(format!(
            "{module}::{handler} for '{}'",
            instance.name().unwrap_or(descriptor.type_key())
        ))?;

        Ok(Some(built))
    }
}
