use crate::annotator::{Annotate, AnnotationEngine};
use crate::error::ModeError;
use crate::fsm::StateMachine;
use crate::mode::Mode;
use crate::palette::Color;
use crate::scene::Scene;

/// Owns the active segmentation mode and re-annotates the scene whenever it
/// changes.
pub struct ModeController<A: Annotate = AnnotationEngine> {
    mode: StateMachine<Mode>,
    annotator: A,
}

impl<A: Annotate> ModeController<A> {
    /// Controller starting in [`Mode::PerPart`].
    pub fn new(annotator: A) -> Self {
        Self::with_mode(annotator, Mode::default())
    }

    pub fn with_mode(annotator: A, mode: Mode) -> Self {
        Self {
            mode: StateMachine::new(mode),
            annotator,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.state
    }

    pub fn annotator(&self) -> &A {
        &self.annotator
    }

    /// Handle a textual mode request (`part` / `object`, any case). An
    /// unknown mode leaves the current one untouched.
    pub fn set_mode(&mut self, scene: &mut dyn Scene, requested: &str) -> Result<Mode, ModeError> {
        let mode: Mode = requested.parse()?;
        self.switch_to(scene, mode);
        Ok(mode)
    }

    /// Switch to `mode`, clearing and re-annotating the whole scene. A
    /// request for the current mode does nothing and returns `false`.
    pub fn switch_to(&mut self, scene: &mut dyn Scene, mode: Mode) -> bool {
        if !self.mode.go(mode) {
            log::debug!("segmentation mode already {mode}");
            return false;
        }
        log::info!("segmentation mode {} -> {mode}", self.mode.previous);
        self.reannotate(scene);
        true
    }

    /// Clear and annotate the scene in the current mode, e.g. for the first
    /// pass at startup.
    pub fn reannotate(&mut self, scene: &mut dyn Scene) {
        self.annotator.clear_all(scene);
        self.annotator.annotate(scene, self.mode.state);
    }

    /// Annotate an entity spawned after the last full pass.
    pub fn on_entity_added(&mut self, scene: &mut dyn Scene, name: &str) {
        self.annotator.on_entity_added(scene, name, self.mode.state);
    }
}

impl ModeController<AnnotationEngine> {
    /// Current color of an entity or `<entity>/<part>` key.
    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.annotator.get_color(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::scene::{EntityView, PartId, RenderApply, SceneQuery};

    struct EmptyScene;

    impl SceneQuery for EmptyScene {
        fn snapshot(&self) -> Result<Vec<EntityView>, SceneError> {
            Ok(Vec::new())
        }
    }

    impl RenderApply for EmptyScene {
        fn ensure_marker(&mut self, _: PartId) -> Result<(), SceneError> {
            Ok(())
        }

        fn set_marker_color(&mut self, _: PartId, _: Color) -> Result<(), SceneError> {
            Ok(())
        }

        fn remove_marker(&mut self, _: PartId) -> Result<bool, SceneError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct CountingAnnotator {
        clears: usize,
        passes: Vec<Mode>,
        added: Vec<(String, Mode)>,
    }

    impl Annotate for CountingAnnotator {
        fn clear_all(&mut self, _: &mut dyn Scene) {
            self.clears += 1;
        }

        fn annotate(&mut self, _: &mut dyn Scene, mode: Mode) {
            self.passes.push(mode);
        }

        fn on_entity_added(&mut self, _: &mut dyn Scene, name: &str, mode: Mode) {
            self.added.push((name.to_owned(), mode));
        }
    }

    #[test]
    fn starts_in_part_mode() {
        let controller = ModeController::new(CountingAnnotator::default());
        assert_eq!(controller.mode(), Mode::PerPart);
    }

    #[test]
    fn same_mode_is_a_no_op() {
        let mut controller = ModeController::new(CountingAnnotator::default());

        assert_eq!(controller.set_mode(&mut EmptyScene, "part"), Ok(Mode::PerPart));
        assert_eq!(controller.set_mode(&mut EmptyScene, "PART"), Ok(Mode::PerPart));

        assert_eq!(controller.annotator().clears, 0);
        assert!(controller.annotator().passes.is_empty());
    }

    #[test]
    fn mode_change_clears_then_annotates_once() {
        let mut controller = ModeController::new(CountingAnnotator::default());

        controller.set_mode(&mut EmptyScene, "object").unwrap();
        assert_eq!(controller.mode(), Mode::PerObjectHierarchy);
        assert_eq!(controller.annotator().clears, 1);
        assert_eq!(controller.annotator().passes, vec![Mode::PerObjectHierarchy]);

        controller.set_mode(&mut EmptyScene, "object").unwrap();
        controller.set_mode(&mut EmptyScene, "part").unwrap();
        assert_eq!(controller.annotator().clears, 2);
        assert_eq!(
            controller.annotator().passes,
            vec![Mode::PerObjectHierarchy, Mode::PerPart]
        );
    }

    #[test]
    fn bogus_mode_changes_nothing() {
        let mut controller =
            ModeController::with_mode(CountingAnnotator::default(), Mode::PerObjectHierarchy);

        let err = controller.set_mode(&mut EmptyScene, "bogus").unwrap_err();

        assert_eq!(err, ModeError::Unsupported("bogus".into()));
        assert_eq!(controller.mode(), Mode::PerObjectHierarchy);
        assert_eq!(controller.annotator().clears, 0);
        assert!(controller.annotator().passes.is_empty());
    }

    #[test]
    fn added_entities_use_current_mode() {
        let mut controller = ModeController::new(CountingAnnotator::default());
        controller.on_entity_added(&mut EmptyScene, "Lamp");
        controller.switch_to(&mut EmptyScene, Mode::PerObjectHierarchy);
        controller.on_entity_added(&mut EmptyScene, "Mug");

        assert_eq!(
            controller.annotator().added,
            vec![
                ("Lamp".to_owned(), Mode::PerPart),
                ("Mug".to_owned(), Mode::PerObjectHierarchy),
            ]
        );
    }

    #[test]
    fn reannotate_forces_a_pass() {
        let mut controller = ModeController::new(CountingAnnotator::default());
        controller.reannotate(&mut EmptyScene);
        assert_eq!(controller.annotator().clears, 1);
        assert_eq!(controller.annotator().passes, vec![Mode::PerPart]);
    }
}
