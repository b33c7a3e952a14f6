//! Compound models (`.cmp`): parts, their joints and mesh references.

use lodestar_common::{decode_text, BinaryReader};

use super::{parse_constructs, Construct, ConstructKind, VMeshData, VMeshRef};
use crate::{Error, NodeId, Result, UtfTree};

/// One part listed under `Cmpnd`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CmpPart {
    /// Name joints refer to, e.g. `Root` or `Turret01`.
    pub object_name: String,
    /// Name of the `.3db` subtree holding the part's meshes.
    pub file_name: String,
    pub index: i32,
}

/// The `Cmpnd` section of a compound model.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CmpModel {
    parts: Vec<CmpPart>,
    constructs: Vec<Construct>,
}

impl CmpModel {
    /// Collect the parts and constructs of a compound model.
    pub fn from_tree(tree: &UtfTree) -> Result<Self> {
        let cmpnd = tree
            .find_path("\\Cmpnd")
            .ok_or_else(|| Error::MissingNode("\\Cmpnd".into()))?;

        let mut model = Self::default();
        for (id, node) in tree.children(cmpnd) {
            let Some(name) = node.name() else { continue };
            if name.eq_ignore_ascii_case("Root") || is_part_name(name) {
                model.parts.push(read_part(tree, id)?);
            }
        }

        if let Some(cons) = tree.find_child(cmpnd, "Cons") {
            for (_, node) in tree.children(cons) {
                let (Some(kind), Some(payload)) = (node.name().and_then(ConstructKind::from_node_name), node.payload())
                else {
                    continue;
                };
                model.constructs.extend(parse_constructs(kind, payload)?);
            }
        }

        tracing::debug!(
            parts = model.parts.len(),
            constructs = model.constructs.len(),
            "read compound model"
        );
        Ok(model)
    }

    /// Parts in file order.
    pub fn parts(&self) -> &[CmpPart] {
        &self.parts
    }

    /// All joints, grouped by kind in `Cons` order.
    pub fn constructs(&self) -> &[Construct] {
        &self.constructs
    }

    /// Find a part by object name, ignoring ASCII case.
    pub fn part(&self, object_name: &str) -> Option<&CmpPart> {
        self.parts
            .iter()
            .find(|part| part.object_name.eq_ignore_ascii_case(object_name))
    }

    /// The joint that attaches `object_name` to its parent.
    pub fn construct_for(&self, object_name: &str) -> Option<&Construct> {
        self.constructs
            .iter()
            .find(|c| c.child().eq_ignore_ascii_case(object_name))
    }

    /// Decode every `VMeshRef` leaf in the tree, in pre-order.
    pub fn vmesh_refs(tree: &UtfTree) -> Result<Vec<(NodeId, VMeshRef)>> {
        tree.find_all("VMeshRef")
            .filter_map(|id| tree.payload(id).map(|payload| (id, payload)))
            .map(|(id, payload)| Ok((id, VMeshRef::parse(payload)?)))
            .collect()
    }

    /// Decode the meshes of an embedded `VMeshLibrary`, keyed by node name.
    pub fn mesh_library(tree: &UtfTree) -> Result<Vec<(String, VMeshData)>> {
        let Some(library) = tree.find_path("\\VMeshLibrary") else {
            return Ok(Vec::new());
        };
        let mut meshes = Vec::new();
        for (id, node) in tree.children(library) {
            if let Some(data) = tree.find_child(id, "VMeshData").and_then(|d| tree.payload(d)) {
                meshes.push((node.name().unwrap_or_default().to_owned(), VMeshData::parse(data)?));
            }
        }
        Ok(meshes)
    }
}

fn is_part_name(name: &str) -> bool {
    name.get(..5).is_some_and(|prefix| prefix.eq_ignore_ascii_case("Part_"))
}

fn read_part(tree: &UtfTree, part: NodeId) -> Result<CmpPart> {
    let leaf = |name: &str| {
        tree.find_child(part, name)
            .and_then(|id| tree.payload(id))
            .ok_or_else(|| Error::MissingNode(format!("{}\\{}", tree.path_of(part), name)))
    };

    Ok(CmpPart {
        object_name: leaf_string(leaf("Object name")?),
        file_name: leaf_string(leaf("File name")?),
        index: BinaryReader::new(leaf("Index")?).read_i32()?,
    })
}

/// Text of a NUL-terminated leaf payload.
fn leaf_string(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    decode_text(&payload[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vmesh::tests::vmesh_ref_bytes;
    use crate::geometry::{FixConstruct, Matrix3, Vector3};
    use crate::parser::tests::{build, Layout};

    fn fix(parent: &str, child: &str) -> Vec<u8> {
        FixConstruct {
            parent: parent.into(),
            child: child.into(),
            origin: Vector3::new(0.0, 1.0, 0.0),
            rotation: Matrix3::IDENTITY,
        }
        .to_bytes()
        .unwrap()
    }

    fn part<'a>(dir: &'a str, fields: &'a [(&'a str, &'a [u8]); 3]) -> Layout<'a> {
        Layout::Dir(dir, fields.iter().map(|&(n, v)| Layout::Leaf(n, v)).collect())
    }

    #[test]
    fn test_compound_model() {
        let mut fixes = fix("Root", "Engine01");
        fixes.extend(fix("Root", "Wing01"));
        let index0 = 0i32.to_le_bytes();
        let index1 = 1i32.to_le_bytes();
        let root: [(&str, &[u8]); 3] = [("Object name", b"Root\0"), ("File name", b"ship.3db\0"), ("Index", &index0)];
        let engine: [(&str, &[u8]); 3] = [("Object name", b"Engine01\0"), ("File name", b"engine.3db\0"), ("Index", &index1)];
        let vmesh_ref = vmesh_ref_bytes(7);

        let data = build(vec![
            Layout::Dir(
                "Cmpnd",
                vec![
                    part("Root", &root),
                    part("Part_Engine01", &engine),
                    Layout::Dir("Cons", vec![Layout::Leaf("Fix", &fixes)]),
                ],
            ),
            Layout::Dir(
                "ship.3db",
                vec![Layout::Dir(
                    "MultiLevel",
                    vec![Layout::Dir("Level0", vec![Layout::Dir("VMeshPart", vec![Layout::Leaf("VMeshRef", &vmesh_ref)])])],
                )],
            ),
        ]);
        let tree = UtfTree::parse(&data).unwrap();
        let model = CmpModel::from_tree(&tree).unwrap();

        assert_eq!(model.parts().len(), 2);
        assert_eq!(model.parts()[1].object_name, "Engine01");
        assert_eq!(model.parts()[1].file_name, "engine.3db");
        assert_eq!(model.parts()[1].index, 1);
        assert_eq!(model.part("root").unwrap().file_name, "ship.3db");

        assert_eq!(model.constructs().len(), 2);
        let wing = model.construct_for("Wing01").unwrap();
        assert_eq!(wing.parent(), "Root");
        assert_eq!(wing.origin(), Vector3::new(0.0, 1.0, 0.0));

        let refs = CmpModel::vmesh_refs(&tree).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].1.mesh_id, 7);
        assert_eq!(
            tree.path_of(refs[0].0),
            "\\ship.3db\\MultiLevel\\Level0\\VMeshPart\\VMeshRef"
        );
        assert!(CmpModel::mesh_library(&tree).unwrap().is_empty());
    }

    #[test]
    fn test_missing_cmpnd() {
        let data = build(vec![Layout::Leaf("Exporter Version", b"1")]);
        let tree = UtfTree::parse(&data).unwrap();
        assert!(matches!(CmpModel::from_tree(&tree), Err(Error::MissingNode(_))));
    }

    #[test]
    fn test_part_missing_field() {
        let data = build(vec![Layout::Dir(
            "Cmpnd",
            vec![Layout::Dir("Root", vec![Layout::Leaf("Object name", b"Root\0")])],
        )]);
        let tree = UtfTree::parse(&data).unwrap();
        let err = CmpModel::from_tree(&tree).unwrap_err();
        assert!(matches!(err, Error::MissingNode(path) if path == "\\Cmpnd\\Root\\File name"));
    }

    #[test]
    fn test_unknown_construct_leaf_ignored() {
        let index = 0i32.to_le_bytes();
        let root: [(&str, &[u8]); 3] = [("Object name", b"Root\0"), ("File name", b"a.3db\0"), ("Index", &index)];
        let data = build(vec![Layout::Dir(
            "Cmpnd",
            vec![part("Root", &root), Layout::Dir("Cons", vec![Layout::Leaf("Loose", b"??")])],
        )]);
        let tree = UtfTree::parse(&data).unwrap();
        assert!(CmpModel::from_tree(&tree).unwrap().constructs().is_empty());
    }

    #[test]
    fn test_part_name_prefix() {
        assert!(is_part_name("Part_Gun"));
        assert!(is_part_name("part_gun"));
        assert!(!is_part_name("Part"));
        assert!(!is_part_name("Cons"));
    }
}
