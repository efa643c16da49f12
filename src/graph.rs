//! Static description of object graph shape.
//!
//! [`Traverse`] is what the propagator walks. Every node answers two
//! questions: is it itself [`Loggable`] (the capability cast), and which
//! nodes hang below it (structural descent). The two are independent: a
//! loggable struct still has its children walked.
//!
//! Implementations are provided for the std containers an object graph is
//! normally built from. User structs get theirs from [`loggable_graph!`].
//!
//! [`loggable_graph!`]: crate::loggable_graph

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::{Rc, Weak};

use crate::{Blob, Loggable, LoggableFlag, Walker};

/// A node of an object graph that the propagator can descend through.
///
/// Both methods have no-op defaults, so a leaf type only needs an empty
/// `impl Traverse for T {}`.
///
/// # Examples
///
/// Hand-written implementation for a type that keeps its loggable state
/// somewhere other than a [`LoggableFlag`]:
///
/// ```
/// use loggable::{set_loggable_enabled, Loggable, Traverse, Walker};
///
/// struct Invoice {
///     muted: bool,
///     lines: Vec<Line>,
/// }
///
/// struct Line {
///     muted: bool,
/// }
///
/// impl Loggable for Line {
///     fn set_enabled(&mut self, enabled: bool) { self.muted = !enabled; }
///     fn enabled(&self) -> bool { !self.muted }
/// }
///
/// impl Traverse for Line {
///     fn as_loggable(&mut self) -> Option<&mut dyn Loggable> { Some(self) }
/// }
///
/// impl Loggable for Invoice {
///     fn set_enabled(&mut self, enabled: bool) { self.muted = !enabled; }
///     fn enabled(&self) -> bool { !self.muted }
/// }
///
/// impl Traverse for Invoice {
///     fn as_loggable(&mut self) -> Option<&mut dyn Loggable> { Some(self) }
///
///     fn walk_children(&mut self, walker: &mut Walker) {
///         walker.visit(&mut self.lines);
///     }
/// }
///
/// let mut invoice = Invoice { muted: false, lines: vec![Line { muted: false }] };
/// set_loggable_enabled(&mut invoice, false).unwrap();
///
/// assert!(!invoice.enabled());
/// assert!(!invoice.lines[0].enabled());
/// ```
pub trait Traverse {
    /// Returns this node as a loggable component, if it is one.
    fn as_loggable(&mut self) -> Option<&mut dyn Loggable> {
        None
    }

    /// Hands every direct child of this node to `walker`, in declaration
    /// or index order.
    fn walk_children(&mut self, walker: &mut Walker) {
        let _ = walker;
    }
}

/// Implements [`Traverse`] (and, for flag-embedding structs, [`Loggable`])
/// for a struct from a list of its fields.
///
/// Two forms are accepted:
///
/// - `loggable_graph!(Type { loggable: flag, child_a, child_b })` makes
///   `Type` loggable by delegating to its `flag` field (any [`Loggable`])
///   and walks `child_a` then `child_b`.
/// - `loggable_graph!(Type { child_a, child_b })` makes `Type` a plain
///   composite node that is only descended through.
///
/// Either form may end with `; skip: field, ...` to name fields that are
/// deliberately not walked. Every field of the struct must appear exactly
/// once, as the flag, a child or a skipped field; the generated impl
/// destructures `Self`, so an unlisted field is a compile error. Children
/// are walked in the order they are listed, which should be declaration
/// order. The macro must be invoked where the fields are visible, and only
/// supports structs with named fields.
///
/// # Examples
///
/// ```
/// use loggable::{loggable_graph, set_loggable_enabled, Loggable, LoggableFlag};
///
/// #[derive(Default)]
/// struct Order {
///     lines: Vec<OrderLine>,
///     note: String,
///     log: LoggableFlag,
/// }
///
/// #[derive(Default)]
/// struct OrderLine {
///     log: LoggableFlag,
/// }
///
/// loggable_graph!(Order { loggable: log, lines; skip: note });
/// loggable_graph!(OrderLine { loggable: log });
///
/// let mut order = Order {
///     lines: vec![OrderLine::default(), OrderLine::default()],
///     ..Default::default()
/// };
///
/// set_loggable_enabled(&mut order, false).unwrap();
/// assert!(!order.enabled());
/// assert!(order.lines.iter().all(|line| !line.enabled()));
/// ```
///
/// Leaving a field out does not compile:
///
/// ```compile_fail
/// use loggable::{loggable_graph, LoggableFlag};
///
/// struct Parent {
///     listed: Vec<LoggableFlag>,
///     forgotten: Vec<LoggableFlag>,
///     log: LoggableFlag,
/// }
///
/// loggable_graph!(Parent { loggable: log, listed });
/// ```
#[macro_export]
macro_rules! loggable_graph {
    ($ty:ty {
        loggable: $flag:ident $(, $field:ident)* $(,)?
        $(; skip: $($skip:ident),+ $(,)?)?
    }) => {
        impl $crate::Loggable for $ty {
            fn set_enabled(&mut self, enabled: bool) {
                $crate::Loggable::set_enabled(&mut self.$flag, enabled)
            }

            fn enabled(&self) -> bool {
                $crate::Loggable::enabled(&self.$flag)
            }
        }

        impl $crate::Traverse for $ty {
            fn as_loggable(&mut self) -> ::core::option::Option<&mut dyn $crate::Loggable> {
                ::core::option::Option::Some(self)
            }

            fn walk_children(&mut self, walker: &mut $crate::Walker) {
                let _ = &walker;
                let Self { $flag: _, $($field,)* $($($skip: _,)+)? } = self;
                $( walker.visit($field); )*
            }
        }
    };
    ($ty:ty {
        $($field:ident),* $(,)?
        $(; skip: $($skip:ident),+ $(,)?)?
    }) => {
        impl $crate::Traverse for $ty {
            fn walk_children(&mut self, walker: &mut $crate::Walker) {
                let _ = &walker;
                let Self { $($field,)* $($($skip: _,)+)? } = self;
                $( walker.visit($field); )*
            }
        }
    };
}

impl Traverse for LoggableFlag {
    fn as_loggable(&mut self) -> Option<&mut dyn Loggable> {
        Some(self)
    }
}

// References

impl<T: Traverse + ?Sized> Traverse for &mut T {
    fn walk_children(&mut self, walker: &mut Walker) {
        walker.visit(&mut **self);
    }
}

impl<T: Traverse + ?Sized> Traverse for Box<T> {
    fn walk_children(&mut self, walker: &mut Walker) {
        walker.visit(&mut **self);
    }
}

impl<T: Traverse> Traverse for Option<T> {
    fn walk_children(&mut self, walker: &mut Walker) {
        if let Some(inner) = self {
            walker.visit(inner);
        }
    }
}

// Shared references. These are the only nodes through which a cycle can
// be built, so they go through the walker's entered set.

impl<T: Traverse + ?Sized> Traverse for Rc<RefCell<T>> {
    fn walk_children(&mut self, walker: &mut Walker) {
        walker.visit_shared(&**self);
    }
}

impl<T: Traverse + ?Sized> Traverse for Weak<RefCell<T>> {
    fn walk_children(&mut self, walker: &mut Walker) {
        if let Some(shared) = self.upgrade() {
            walker.visit_shared(&*shared);
        }
    }
}

// Sequences

impl<T: Traverse> Traverse for [T] {
    fn walk_children(&mut self, walker: &mut Walker) {
        for item in self.iter_mut() {
            walker.visit(item);
        }
    }
}

impl<T: Traverse, const N: usize> Traverse for [T; N] {
    fn walk_children(&mut self, walker: &mut Walker) {
        for item in self.iter_mut() {
            walker.visit(item);
        }
    }
}

impl<T: Traverse> Traverse for Vec<T> {
    fn walk_children(&mut self, walker: &mut Walker) {
        for item in self.iter_mut() {
            walker.visit(item);
        }
    }
}

impl<T: Traverse> Traverse for VecDeque<T> {
    fn walk_children(&mut self, walker: &mut Walker) {
        for item in self.iter_mut() {
            walker.visit(item);
        }
    }
}

// Leaves: scalars, text, maps and opaque values end the descent.

macro_rules! leaf_nodes {
    ($($ty:ty),* $(,)?) => {
        $( impl Traverse for $ty {} )*
    };
}

leaf_nodes!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
    Blob,
    serde_json::Value,
    uuid::Uuid,
    chrono::DateTime<chrono::Utc>,
);

impl<K, V, S> Traverse for HashMap<K, V, S> {}

impl<K, V> Traverse for BTreeMap<K, V> {}

impl<T, S> Traverse for HashSet<T, S> {}

impl<T> Traverse for BTreeSet<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set_loggable_enabled;

    #[derive(Default)]
    struct Leafy {
        count: u32,
        name: String,
        tags: HashMap<String, String>,
        log: LoggableFlag,
    }

    crate::loggable_graph!(Leafy { loggable: log, count, name, tags });

    #[derive(Default)]
    struct Holder {
        boxed: Box<Leafy>,
        maybe: Option<Leafy>,
        fixed: [LoggableFlag; 2],
        queue: VecDeque<Leafy>,
    }

    crate::loggable_graph!(Holder { boxed, maybe, fixed, queue });

    #[derive(Default)]
    struct Draft {
        published: Vec<Leafy>,
        scratch: Vec<Leafy>,
        revision: u32,
        log: LoggableFlag,
    }

    crate::loggable_graph!(Draft { loggable: log, published; skip: scratch, revision });

    #[derive(Default)]
    struct Detached {
        cache: Leafy,
    }

    crate::loggable_graph!(Detached { ; skip: cache });

    #[test]
    fn leaves_are_not_loggable() {
        let mut number = 7u32;
        let mut text = String::from("x");
        assert!(number.as_loggable().is_none());
        assert!(text.as_loggable().is_none());
    }

    #[test]
    fn flag_is_its_own_loggable() {
        let mut flag = LoggableFlag::new();
        let cast = flag.as_loggable().expect("flag is loggable");
        cast.set_enabled(false);
        assert!(!flag.enabled());
    }

    #[test]
    fn macro_struct_delegates_to_flag() {
        let mut leafy = Leafy::default();
        leafy.set_enabled(false);
        assert!(leafy.log.is_disabled());
        assert!(!leafy.enabled());
    }

    #[test]
    fn plain_composite_is_not_loggable() {
        let mut holder = Holder::default();
        assert!(holder.as_loggable().is_none());
    }

    #[test]
    fn descends_through_box_option_array_and_deque() {
        let mut holder = Holder {
            maybe: Some(Leafy::default()),
            queue: VecDeque::from(vec![Leafy::default(), Leafy::default()]),
            ..Default::default()
        };

        set_loggable_enabled(&mut holder, false).unwrap();

        assert!(!holder.boxed.enabled());
        assert!(!holder.maybe.as_ref().unwrap().enabled());
        assert!(holder.fixed.iter().all(|f| !f.enabled()));
        assert!(holder.queue.iter().all(|l| !l.enabled()));
        assert_eq!(holder.boxed.count, 0);
        assert!(holder.boxed.name.is_empty());
        assert!(holder.boxed.tags.is_empty());
    }

    #[test]
    fn empty_option_is_skipped() {
        let mut holder = Holder::default();
        let report = set_loggable_enabled(&mut holder, false).unwrap();

        assert!(holder.maybe.is_none());
        // boxed leafy + two fixed flags
        assert_eq!(report.flags_updated, 3);
    }

    #[test]
    fn boxed_trait_objects_are_walked() {
        let mut nodes: Vec<Box<dyn Traverse>> = Vec::new();
        nodes.push(Box::new(LoggableFlag::new()));
        nodes.push(Box::new(Leafy::default()));
        nodes.push(Box::new(42u8));

        let report = set_loggable_enabled(&mut nodes, false).unwrap();
        assert_eq!(report.flags_updated, 2);
    }

    #[test]
    fn skipped_fields_are_not_walked() {
        let mut draft = Draft {
            published: vec![Leafy::default()],
            scratch: vec![Leafy::default(), Leafy::default()],
            revision: 3,
            ..Default::default()
        };

        let report = set_loggable_enabled(&mut draft, false).unwrap();

        assert!(!draft.enabled());
        assert!(!draft.published[0].enabled());
        assert!(draft.scratch.iter().all(Loggable::enabled));
        assert_eq!(draft.revision, 3);
        assert_eq!(report.flags_updated, 2);
    }

    #[test]
    fn composite_with_only_skipped_fields_is_a_leaf() {
        let mut detached = Detached::default();

        let report = set_loggable_enabled(&mut detached, false).unwrap();

        assert!(detached.cache.enabled());
        assert_eq!(report.flags_updated, 0);
        assert_eq!(report.nodes_visited, 1);
    }

    #[test]
    fn slices_are_walked_in_place() {
        let mut flags = vec![LoggableFlag::new(); 3];
        set_loggable_enabled(&mut flags[..], false).unwrap();
        assert!(flags.iter().all(|f| f.is_disabled()));
    }
}
