/// The capability set every recorded action provides.
use anyhow::Result;

/// A reversible operation recorded into a `HistoryManager`.
///
/// `T` is the target the action mutates (a document, a scene, a log).
/// The manager hands it to every call and never looks inside the action.
pub trait Action<T> {
    /// Reverses the action's effect on `target`.
    fn undo(&mut self, target: &mut T) -> Result<()>;

    /// Reapplies the action's effect on `target`.
    fn redo(&mut self, target: &mut T) -> Result<()>;

    /// Called exactly once when the action leaves history for good,
    /// either through capacity trim or branch pruning.
    ///
    /// Release anything held in reserve for a possible redo here.
    fn cull(&mut self, _target: &mut T) -> Result<()> {
        Ok(())
    }

    /// Type tag shown in diagnostic snapshots.
    fn label(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }
}

/// Strips the module path (and any generic arguments' paths) down to the
/// final segment of the outer type name.
fn short_type_name(full: &str) -> &str {
    let outer = full.split('<').next().unwrap_or(full);
    outer.rsplit("::").next().unwrap_or(outer)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Action<()> for Noop {
        fn undo(&mut self, _target: &mut ()) -> Result<()> {
            Ok(())
        }

        fn redo(&mut self, _target: &mut ()) -> Result<()> {
            Ok(())
        }
    }

    struct Named;

    impl Action<()> for Named {
        fn undo(&mut self, _target: &mut ()) -> Result<()> {
            Ok(())
        }

        fn redo(&mut self, _target: &mut ()) -> Result<()> {
            Ok(())
        }

        fn label(&self) -> String {
            "rename".to_string()
        }
    }

    #[test]
    fn test_default_label_is_short_type_name() {
        assert_eq!(Noop.label(), "Noop");
    }

    #[test]
    fn test_default_label_through_trait_object() {
        let boxed: Box<dyn Action<()>> = Box::new(Noop);
        assert_eq!(boxed.label(), "Noop");
    }

    #[test]
    fn test_label_override() {
        assert_eq!(Named.label(), "rename");
    }

    #[test]
    fn test_default_cull_is_ok() {
        assert!(Noop.cull(&mut ()).is_ok());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Spawn"), "Spawn");
        assert_eq!(short_type_name("a::Wrap<b::Inner>"), "Wrap");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
