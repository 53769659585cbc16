//! Cycle-tolerant traversal of the sub-object tree.
//!
//! Child/sibling links are positional indices into the flat `objects`
//! table, not owning references. A handful of legacy assets contain
//! self-referential links (an object whose child index points back at
//! itself), so traversal never assumes acyclicity: every walk carries a
//! visited set and stops at the first revisited index.

use tracing::warn;

use crate::model::ModelFile;

impl ModelFile {
    /// Direct children of the object at `parent`, in sibling-link order.
    ///
    /// A link that revisits an already-seen object (including `parent`
    /// itself) stops the walk at that point. The anomaly is logged and
    /// tolerated, never an error.
    pub fn children_of(&self, parent: usize) -> Vec<usize> {
        let mut children = Vec::new();
        let Some(object) = self.objects.get(parent) else {
            return children;
        };

        let mut visited = vec![false; self.objects.len()];
        visited[parent] = true;

        let mut link = object.child_object_index;
        while link >= 0 && (link as usize) < self.objects.len() {
            let index = link as usize;
            if visited[index] {
                warn!(parent, child = index, "cycle in object hierarchy, stopping traversal");
                break;
            }
            visited[index] = true;
            children.push(index);
            link = self.objects[index].sibling_object_index;
        }
        children
    }

    /// Objects that no child or sibling link points at. Well-formed models
    /// have exactly one root (object 0); a cyclic graph may have none, in
    /// which case object 0 is reported as the root anyway so callers always
    /// have somewhere to start.
    pub fn root_objects(&self) -> Vec<usize> {
        let mut referenced = vec![false; self.objects.len()];
        for (index, object) in self.objects.iter().enumerate() {
            for link in [object.child_object_index, object.sibling_object_index] {
                // A self-link is the known anomaly; it does not make the
                // object its own parent.
                if link >= 0 && (link as usize) < self.objects.len() && link as usize != index {
                    referenced[link as usize] = true;
                }
            }
        }

        let roots: Vec<usize> = (0..self.objects.len()).filter(|&i| !referenced[i]).collect();
        if roots.is_empty() && !self.objects.is_empty() {
            warn!("object hierarchy has no unreferenced root, defaulting to object 0");
            return vec![0];
        }
        roots
    }
}
