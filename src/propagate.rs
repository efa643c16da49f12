//! Recursive propagation of the loggable state over an object graph.
//!
//! The walk is depth-first: a node's own capability is updated first, then
//! its children are visited in the order its [`Traverse`] impl hands them
//! over. Owned nodes are reached exactly once by construction. Shared nodes
//! (`Rc<RefCell<_>>`) are keyed by address so that a node reachable along
//! several paths, or through a reference cycle, is entered only once per call.
//!
//! # Compile-Time Root Check
//!
//! The root must be a reference. Passing the graph by value does not
//! compile:
//!
//! ```compile_fail
//! use loggable::{loggable_graph, set_loggable_enabled, LoggableFlag};
//!
//! struct Account {
//!     log: LoggableFlag,
//! }
//!
//! loggable_graph!(Account { loggable: log });
//!
//! let account = Account { log: LoggableFlag::new() };
//! set_loggable_enabled(account, false).unwrap();
//! ```

use std::cell::RefCell;
use std::collections::HashSet;

use crate::{Error, Traverse};

/// Summary of a single propagation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Number of graph nodes visited, containers included
    pub nodes_visited: usize,
    /// Number of loggable components whose state was set
    pub flags_updated: usize,
    /// Shared nodes reached again after already being entered
    pub shared_revisits: usize,
    /// Shared nodes skipped because they were borrowed elsewhere
    pub busy_skipped: usize,
    /// Deepest nesting level reached, the root being level 1
    pub max_depth: usize,
}

/// Depth-first visitor that sets every loggable node it reaches.
///
/// A `Walker` is handed to [`Traverse::walk_children`]; implementations
/// call [`visit`](Walker::visit) for each child. Use
/// [`set_loggable_enabled`] to run a walk from a root.
#[derive(Debug)]
pub struct Walker {
    enabled: bool,
    entered: HashSet<usize>,
    depth: usize,
    report: Propagation,
}

impl Walker {
    /// Creates a walker that applies `enabled` to every loggable node.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entered: HashSet::new(),
            depth: 0,
            report: Propagation::default(),
        }
    }

    /// Returns the state this walker applies.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Visits `node`: sets its loggable state if it has one, then descends
    /// into its children.
    pub fn visit<T: Traverse + ?Sized>(&mut self, node: &mut T) {
        self.report.nodes_visited += 1;

        if let Some(component) = node.as_loggable() {
            component.set_enabled(self.enabled);
            self.report.flags_updated += 1;
            tracing::trace!(
                depth = self.depth,
                enabled = self.enabled,
                "loggable state set"
            );
        }

        self.depth += 1;
        self.report.max_depth = self.report.max_depth.max(self.depth);
        node.walk_children(self);
        self.depth -= 1;
    }

    /// Visits the value behind a shared cell, at most once per walk.
    ///
    /// A cell that is currently borrowed elsewhere cannot be updated in
    /// place; it is skipped and counted in [`Propagation::busy_skipped`].
    pub fn visit_shared<T: Traverse + ?Sized>(&mut self, cell: &RefCell<T>) {
        let addr = cell as *const RefCell<T> as *const () as usize;
        if !self.entered.insert(addr) {
            self.report.shared_revisits += 1;
            return;
        }

        match cell.try_borrow_mut() {
            Ok(mut inner) => self.visit(&mut *inner),
            Err(_) => {
                self.report.busy_skipped += 1;
                tracing::warn!(
                    depth = self.depth,
                    "shared node already borrowed, loggable state left unchanged"
                );
            }
        }
    }

    /// Ends the walk and returns what it did.
    pub fn finish(self) -> Propagation {
        self.report
    }
}

/// Argument accepted as the root of a propagation.
///
/// Implemented for `&mut T` and for `Option<&mut T>`. A `None` root stands
/// for "no reference given" and is rejected with
/// [`Error::InvalidArgument`].
pub trait GraphRoot<'a> {
    /// Type of the referenced root node
    type Node: Traverse + ?Sized + 'a;

    /// Returns the root reference, if there is one.
    fn into_node(self) -> Option<&'a mut Self::Node>;
}

impl<'a, T: Traverse + ?Sized + 'a> GraphRoot<'a> for &'a mut T {
    type Node = T;

    fn into_node(self) -> Option<&'a mut T> {
        Some(self)
    }
}

impl<'a, T: Traverse + ?Sized + 'a> GraphRoot<'a> for Option<&'a mut T> {
    type Node = T;

    fn into_node(self) -> Option<&'a mut T> {
        self
    }
}

/// Sets the loggable state of every component reachable from `root`.
///
/// Returns [`Error::InvalidArgument`] without touching anything when no
/// root reference is given. Once the walk starts it always completes.
///
/// # Shared Roots
///
/// When the root lives in an `Rc<RefCell<_>>`, pass the `Rc` itself
/// (`&mut rc`). The root cell is then entered like any other shared node
/// and a cycle leading back to it is counted in
/// [`Propagation::shared_revisits`]. A root reached through
/// `&mut *rc.borrow_mut()` is not known to the walker as a cell; if the
/// graph cycles back to it, the cell is found borrowed and is counted in
/// [`Propagation::busy_skipped`] with a warning, although the root itself
/// has already been set.
///
/// # Examples
///
/// ```
/// use loggable::{loggable_graph, set_loggable_enabled, Loggable, LoggableFlag};
///
/// #[derive(Default)]
/// struct Client {
///     passports: Vec<Passport>,
///     log: LoggableFlag,
/// }
///
/// #[derive(Default)]
/// struct Passport {
///     log: LoggableFlag,
/// }
///
/// loggable_graph!(Client { loggable: log, passports });
/// loggable_graph!(Passport { loggable: log });
///
/// let mut client = Client {
///     passports: vec![Passport::default(), Passport::default()],
///     ..Default::default()
/// };
///
/// let report = set_loggable_enabled(&mut client, false).unwrap();
/// assert_eq!(report.flags_updated, 3);
/// assert!(!client.enabled());
/// assert!(!client.passports[1].enabled());
///
/// let missing: Option<&mut Client> = None;
/// assert!(set_loggable_enabled(missing, true).is_err());
/// ```
pub fn set_loggable_enabled<'a, R: GraphRoot<'a>>(
    root: R,
    enabled: bool,
) -> Result<Propagation, Error> {
    let node = root
        .into_node()
        .ok_or(Error::InvalidArgument("not a pointer value"))?;

    let mut walker = Walker::new(enabled);
    walker.visit(node);
    let report = walker.finish();

    tracing::debug!(
        enabled,
        nodes_visited = report.nodes_visited,
        flags_updated = report.flags_updated,
        shared_revisits = report.shared_revisits,
        busy_skipped = report.busy_skipped,
        max_depth = report.max_depth,
        "loggable state propagated"
    );

    Ok(report)
}
