use std::collections::HashMap;

use autoaim_core::time::{Local, Timestamp};

use crate::error::UartError;
use crate::message::InboundMessage;

/// A type-erased handler: parses a message body of its declared type and
/// dispatches it.
pub trait RxHandler {
    fn type_id(&self) -> u16;
    fn handle(&mut self, body: &[u8], receipt_timestamp: Timestamp<Local>) -> Result<(), UartError>;
}

/// Adapts an `InboundMessage` and a closure into an [`RxHandler`].
pub struct TypedHandler<M: InboundMessage, F: FnMut(M, Timestamp<Local>)> {
    callback: F,
    _marker: std::marker::PhantomData<M>,
}

impl<M: InboundMessage, F: FnMut(M, Timestamp<Local>)> TypedHandler<M, F> {
    pub fn new(callback: F) -> Self {
        TypedHandler {
            callback,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<M: InboundMessage, F: FnMut(M, Timestamp<Local>)> RxHandler for TypedHandler<M, F> {
    fn type_id(&self) -> u16 {
        M::TYPE_ID
    }

    fn handle(&mut self, body: &[u8], receipt_timestamp: Timestamp<Local>) -> Result<(), UartError> {
        let message = M::parse(body)?;
        (self.callback)(message, receipt_timestamp);
        Ok(())
    }
}

/// A registry of handlers keyed by message type id. Construction fails if
/// two handlers declare the same type id.
pub struct HandlerRegistry {
    handlers: HashMap<u16, Box<dyn RxHandler + Send>>,
}

impl HandlerRegistry {
    pub fn new(handlers: Vec<Box<dyn RxHandler + Send>>) -> Result<Self, UartError> {
        let mut map = HashMap::with_capacity(handlers.len());
        for handler in handlers {
            let type_id = handler.type_id();
            if map.insert(type_id, handler).is_some() {
                return Err(UartError::DuplicateTypeId(type_id));
            }
        }
        Ok(HandlerRegistry { handlers: map })
    }

    pub fn get_mut(&mut self, type_id: u16) -> Option<&mut Box<dyn RxHandler + Send>> {
        self.handlers.get_mut(&type_id)
    }
}
