//! A single virtual workspace on a monitor
use crate::{pure::layout::Layout, Xid};

/// One of the fixed set of virtual workspaces available on each monitor.
///
/// A view tracks the same clients in two orders: `clients` is creation
/// order (modulo promotions to master) and is what layouts consume, `stack`
/// is most-recently-focused first. The selected client of a view is always
/// the head of its focus stack.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub(crate) mfact: f64,
    pub(crate) layout: Layout,
    pub(crate) clients: Vec<Xid>,
    pub(crate) stack: Vec<Xid>,
}

impl View {
    pub(crate) fn new(mfact: f64, layout: Layout) -> Self {
        Self {
            mfact,
            layout,
            clients: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// The fraction of the work area given to the master client
    pub fn mfact(&self) -> f64 {
        self.mfact
    }

    /// The layout currently applied to this view
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The selected client of this view: the most recently focused one
    pub fn focused(&self) -> Option<Xid> {
        self.stack.first().copied()
    }

    /// Whether any clients are present on this view
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether the given client is on this view
    pub fn contains(&self, id: Xid) -> bool {
        self.clients.contains(&id)
    }

    /// The clients of this view in layout order
    pub fn clients(&self) -> &[Xid] {
        &self.clients
    }

    /// The clients of this view in most-recently-focused order
    pub fn focus_stack(&self) -> &[Xid] {
        &self.stack
    }

    /// Add a client to this view: client list stays in creation order (new
    /// clients at the tail), the focus stack gets the newcomer at its head.
    pub(crate) fn attach(&mut self, id: Xid) {
        self.clients.push(id);
        self.stack.insert(0, id);
    }

    /// Add a client at the head of both lists. Used when re-homing clients
    /// from a removed monitor.
    pub(crate) fn attach_front(&mut self, id: Xid) {
        self.clients.insert(0, id);
        self.stack.insert(0, id);
    }

    /// Remove a client from both lists.
    pub(crate) fn detach(&mut self, id: Xid) {
        self.clients.retain(|&c| c != id);
        self.stack.retain(|&c| c != id);
    }

    /// Move a client already on this view to the head of the focus stack.
    pub(crate) fn promote_focus(&mut self, id: Xid) {
        if let Some(pos) = self.stack.iter().position(|&c| c == id) {
            self.stack.remove(pos);
            self.stack.insert(0, id);
        }
    }

    /// Move a client already on this view to the head of the client list,
    /// making it the master for layouts that have one.
    pub(crate) fn promote_client(&mut self, id: Xid) {
        if let Some(pos) = self.clients.iter().position(|&c| c == id) {
            self.clients.remove(pos);
            self.clients.insert(0, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(ids: &[u32]) -> View {
        let mut v = View::new(0.55, Layout::Tile);
        for &id in ids.iter().rev() {
            v.attach(Xid(id));
        }

        v
    }

    #[test]
    fn attach_keeps_creation_order_and_prepends_focus() {
        let v = view_with(&[3, 2, 1]);

        assert_eq!(v.clients, vec![Xid(1), Xid(2), Xid(3)]);
        assert_eq!(v.stack, vec![Xid(3), Xid(2), Xid(1)]);
        assert_eq!(v.focused(), Some(Xid(3)));
    }

    #[test]
    fn attach_front_prepends_to_both_lists() {
        let mut v = view_with(&[2, 1]);

        v.attach_front(Xid(3));

        assert_eq!(v.clients, vec![Xid(3), Xid(1), Xid(2)]);
        assert_eq!(v.stack, vec![Xid(3), Xid(2), Xid(1)]);
    }

    #[test]
    fn detach_removes_from_both_lists() {
        let mut v = view_with(&[3, 2, 1]);

        v.detach(Xid(2));

        assert_eq!(v.clients, vec![Xid(1), Xid(3)]);
        assert_eq!(v.stack, vec![Xid(3), Xid(1)]);
    }

    #[test]
    fn promote_focus_leaves_client_order_untouched() {
        let mut v = view_with(&[3, 2, 1]);

        v.promote_focus(Xid(1));

        assert_eq!(v.clients, vec![Xid(1), Xid(2), Xid(3)]);
        assert_eq!(v.stack, vec![Xid(1), Xid(3), Xid(2)]);
        assert_eq!(v.focused(), Some(Xid(1)));
    }

    #[test]
    fn promote_client_leaves_stack_untouched() {
        let mut v = view_with(&[3, 2, 1]);

        v.promote_client(Xid(3));

        assert_eq!(v.clients, vec![Xid(3), Xid(1), Xid(2)]);
        assert_eq!(v.stack, vec![Xid(3), Xid(2), Xid(1)]);
    }

    #[test]
    fn promoting_unknown_clients_is_a_noop() {
        let mut v = view_with(&[2, 1]);

        v.promote_focus(Xid(9));
        v.promote_client(Xid(9));

        assert_eq!(v, view_with(&[2, 1]));
    }
}
