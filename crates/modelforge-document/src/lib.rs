//! A [`ModelFile`] wrapped in a command-based edit log.
//!
//! Standard linear undo history: `do_action` applies and pushes, `undo` and
//! `redo` move along the history, and any new action after an undo discards
//! the redo branch. The dirty flag tracks whether unsaved edits exist — it
//! clears when the undo stack empties (undo-to-base) or on a successful
//! save, which also clears both stacks.

use std::fs;
use std::path::Path;

use lgmd::ModelFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("model serialization error: {0}")]
    Model(#[from] lgmd::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Op = Box<dyn Fn(&mut ModelFile)>;

/// A paired (apply, revert) operation on the model.
pub struct EditAction {
    apply: Op,
    revert: Op,
}

impl EditAction {
    pub fn new(
        apply: impl Fn(&mut ModelFile) + 'static,
        revert: impl Fn(&mut ModelFile) + 'static,
    ) -> Self {
        Self {
            apply: Box::new(apply),
            revert: Box::new(revert),
        }
    }
}

/// An open model plus its edit history.
pub struct ModelDocument {
    model: ModelFile,
    name: String,
    campaign: String,
    dirty: bool,
    undo: Vec<EditAction>,
    redo: Vec<EditAction>,
}

impl ModelDocument {
    pub fn new(model: ModelFile, name: impl Into<String>, campaign: impl Into<String>) -> Self {
        Self {
            model,
            name: name.into(),
            campaign: campaign.into(),
            dirty: false,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn model(&self) -> &ModelFile {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    /// Whether unsaved edits exist.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Apply an action and push it onto the undo stack. Any redoable
    /// actions are discarded — this is a linear history, not a tree.
    pub fn do_action(&mut self, action: EditAction) {
        debug!("doing");
        (action.apply)(&mut self.model);
        self.undo.push(action);
        self.redo.clear();
        self.dirty = true;
    }

    /// Revert the most recent action. Returns false when there is nothing
    /// left to undo.
    pub fn undo(&mut self) -> bool {
        debug!("undoing");
        let Some(action) = self.undo.pop() else {
            debug!("nothing left to undo");
            return false;
        };
        (action.revert)(&mut self.model);
        self.redo.push(action);
        self.dirty = !self.undo.is_empty();
        true
    }

    /// Re-apply the most recently undone action. Returns false when there
    /// is nothing left to redo.
    pub fn redo(&mut self) -> bool {
        debug!("redoing");
        let Some(action) = self.redo.pop() else {
            debug!("nothing left to redo");
            return false;
        };
        (action.apply)(&mut self.model);
        self.undo.push(action);
        self.dirty = true;
        true
    }

    /// Serialize the model to `path`. On success the edit history is
    /// cleared and the document is no longer dirty.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let data = self.model.write()?;
        fs::write(path, data)?;
        info!(path = %path.display(), "saved model");

        self.undo.clear();
        self.redo.clear();
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lgmd::{FormatVersion, MaterialKind, ModelMaterial, Vec3};

    fn material_model() -> ModelFile {
        ModelFile {
            name: "doc".to_string(),
            version: FormatVersion::V4,
            radius: 1.0,
            center: Vec3::default(),
            min_bounds: Vec3::default(),
            max_bounds: Vec3::default(),
            vertex_positions: Vec::new(),
            vertex_normals: Vec::new(),
            vertex_uvs: Vec::new(),
            face_normals: Vec::new(),
            polygons: Vec::new(),
            objects: Vec::new(),
            vhots: Vec::new(),
            materials: vec![ModelMaterial {
                name: "wood".to_string(),
                kind: MaterialKind::Texture,
                slot: 3,
                color: [0, 0, 0, 255],
                palette_index: 0,
                transparency: 0.0,
                self_illumination: 0.0,
            }],
        }
    }

    fn rename_material(from: &str, to: &str) -> EditAction {
        let from = from.to_string();
        let to = to.to_string();
        EditAction::new(
            move |m: &mut ModelFile| m.materials[0].name = to.clone(),
            move |m: &mut ModelFile| m.materials[0].name = from.clone(),
        )
    }

    #[test]
    fn do_undo_redo_track_dirty() {
        let mut doc = ModelDocument::new(material_model(), "doc", "");
        assert!(!doc.dirty());

        doc.do_action(rename_material("wood", "stone"));
        assert_eq!(doc.model().materials[0].name, "stone");
        assert!(doc.dirty());

        assert!(doc.undo());
        assert_eq!(doc.model().materials[0].name, "wood");
        assert!(!doc.dirty());
        assert!(!doc.undo());

        assert!(doc.redo());
        assert_eq!(doc.model().materials[0].name, "stone");
        assert!(doc.dirty());
        assert!(!doc.redo());
    }

    #[test]
    fn new_action_discards_redo_branch() {
        let mut doc = ModelDocument::new(material_model(), "doc", "");
        doc.do_action(rename_material("wood", "stone"));
        doc.undo();
        doc.do_action(rename_material("wood", "iron"));
        assert!(!doc.redo());
        assert_eq!(doc.model().materials[0].name, "iron");
    }

    #[test]
    fn undo_partway_stays_dirty() {
        let mut doc = ModelDocument::new(material_model(), "doc", "");
        doc.do_action(rename_material("wood", "stone"));
        doc.do_action(rename_material("stone", "iron"));
        assert!(doc.undo());
        // One edit remains on the stack.
        assert!(doc.dirty());
    }

    #[test]
    fn save_clears_history_and_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.bin");
        let mut doc = ModelDocument::new(material_model(), "doc", "");

        doc.do_action(rename_material("wood", "stone"));
        doc.save(&path).unwrap();
        assert!(!doc.dirty());
        assert!(!doc.undo());
        assert!(!doc.redo());

        // The edit was persisted.
        let reloaded = ModelFile::parse(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(reloaded.materials[0].name, "stone");
    }
}
