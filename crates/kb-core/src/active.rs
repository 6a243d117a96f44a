// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Insertion-ordered list of active rules.
//!
//! Doubly linked through per-slot links so that removing a rule is O(1) and a
//! cursor sitting on the removed rule can step to its successor, the way the
//! completion driver's outer/inner cursors need.
use crate::rule::RuleId;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<RuleId>,
    next: Option<RuleId>,
    linked: bool,
}

/// Active rules in insertion order.
#[derive(Debug, Default, Clone)]
pub(crate) struct ActiveRules {
    links: Vec<Link>,
    head: Option<RuleId>,
    tail: Option<RuleId>,
    len: usize,
}

impl ActiveRules {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> Option<RuleId> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<RuleId> {
        self.tail
    }

    pub(crate) fn next(&self, id: RuleId) -> Option<RuleId> {
        self.links[id.slot()].next
    }

    /// Predecessor of a cursor; the end cursor (`None`) steps back to the tail.
    pub(crate) fn prev_of(&self, cursor: Option<RuleId>) -> Option<RuleId> {
        match cursor {
            Some(id) => self.links[id.slot()].prev,
            None => self.tail,
        }
    }

    pub(crate) fn contains(&self, id: RuleId) -> bool {
        self.links.get(id.slot()).is_some_and(|l| l.linked)
    }

    pub(crate) fn push_back(&mut self, id: RuleId) {
        if self.links.len() <= id.slot() {
            self.links.resize(id.slot() + 1, Link::default());
        }
        assert!(!self.links[id.slot()].linked, "rule already active");
        self.links[id.slot()] = Link {
            prev: self.tail,
            next: None,
            linked: true,
        };
        match self.tail {
            Some(tail) => self.links[tail.slot()].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.len += 1;
    }

    /// Unlinks `id` and returns its former successor.
    pub(crate) fn remove(&mut self, id: RuleId) -> Option<RuleId> {
        let link = self.links[id.slot()];
        assert!(link.linked, "rule not active");
        match link.prev {
            Some(prev) => self.links[prev.slot()].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.links[next.slot()].prev = link.prev,
            None => self.tail = link.prev,
        }
        self.links[id.slot()] = Link::default();
        self.len -= 1;
        link.next
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Forward iteration in insertion order.
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = RuleId> + '_ {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }
}

struct Iter<'a> {
    list: &'a ActiveRules,
    front: Option<RuleId>,
    back: Option<RuleId>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = RuleId;

    fn next(&mut self) -> Option<RuleId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.list.links[id.slot()].next;
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<RuleId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.list.links[id.slot()].prev;
        self.remaining -= 1;
        Some(id)
    }
}
