use crate::models::frame_range::Frame;
use crate::models::render_target::NodeInfo;
use std::path::PathBuf;

/// Event name katana fires when the node selection changes.
pub const SELECTION_CHANGED: &str = "node_setSelected";

/// What the output tool reads from the running host application.
pub trait Host {
    /// Currently selected nodes, in the order the node graph reports them.
    fn selected_nodes(&self) -> Vec<NodeInfo>;
    /// Working in/out frames of the scene.
    fn working_range(&self) -> (Frame, Frame);
    /// Path of the scene file currently open.
    fn scene_file(&self) -> PathBuf;
}

pub type SelectionHandler = Box<dyn FnMut(&[NodeInfo])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observer list for selection changes. The host calls [`SelectionEvents::notify`]
/// on its event loop thread, handlers run synchronously in subscription order.
#[derive(Default)]
pub struct SelectionEvents {
    next_id: u64,
    handlers: Vec<(SubscriptionId, SelectionHandler)>,
}

impl SelectionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: SelectionHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Returns false when the id was never registered or already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        before != self.handlers.len()
    }

    pub fn notify(&mut self, nodes: &[NodeInfo]) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(nodes);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Host snapshot with fixed values, used when running outside of katana.
#[derive(Debug, Clone)]
pub struct StaticHost {
    pub nodes: Vec<NodeInfo>,
    pub range: (Frame, Frame),
    pub scene: PathBuf,
}

impl Host for StaticHost {
    fn selected_nodes(&self) -> Vec<NodeInfo> {
        self.nodes.clone()
    }

    fn working_range(&self) -> (Frame, Frame) {
        self.range
    }

    fn scene_file(&self) -> PathBuf {
        self.scene.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notify_and_unsubscribe() {
        let mut events = SelectionEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let id = events.subscribe(Box::new(move |nodes: &[NodeInfo]| {
            sink.borrow_mut().push(nodes.len());
        }));
        assert_eq!(events.len(), 1);

        events.notify(&[NodeInfo::new("a", "Render"), NodeInfo::new("b", "Merge")]);
        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        events.notify(&[NodeInfo::new("c", "Render")]);

        assert_eq!(*seen.borrow(), vec![2]);
        assert!(events.is_empty());
    }
}
