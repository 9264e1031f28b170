//! Node material with a pluggable editor.
//!
//! The engine's material type keeps its own behaviour; only `edit` differs,
//! so the material is wrapped together with the [`NodeEditor`] that opens
//! for it instead of being specialised.

use std::{fmt::Debug, rc::Rc};

use futures::future::{self, Ready};

/// Construction options for a node material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterialOptions {
    /// Emit comments into the generated shader code.
    pub emit_comments: bool,
}

/// Options forwarded to the editor when it opens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Where to fetch the editor from, if it is not bundled.
    pub editor_url: Option<String>,
}

/// Opens an external node-graph editor for a material.
///
/// `show` only launches the editor; the editor's own interaction loop is not
/// tracked.
pub trait NodeEditor<M> {
    fn show(&self, material: &Rc<M>, options: &EditorOptions) -> anyhow::Result<()>;
}

pub struct EditableMaterial<M> {
    material: Rc<M>,
    editor: Rc<dyn NodeEditor<M>>,
}

impl<M: 'static> EditableMaterial<M> {
    pub fn new(material: M, editor: Rc<dyn NodeEditor<M>>) -> Self {
        Self {
            material: Rc::new(material),
            editor,
        }
    }

    pub fn material(&self) -> &Rc<M> {
        &self.material
    }

    /// Open the editor bound to this material.
    ///
    /// The editor is launched before this returns; the future is already
    /// resolved and only carries the launch result.
    pub fn edit(&self, options: &EditorOptions) -> Ready<anyhow::Result<()>> {
        log::debug!("opening node editor");
        future::ready(self.editor.show(&self.material, options))
    }
}

impl<M> Debug for EditableMaterial<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EditableMaterial")
    }
}
