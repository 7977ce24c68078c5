//! Text persistence of joint hierarchies.
//!
//! One joint per line, parents before their children:
//!
//! ```text
//! create -joint joint1 -rotate <0, 0, 0> -translate <0.04, -1.01, 0> -parent joint0;
//! ```
//!
//! Roots leave the parent empty. Components are rounded half up to two decimals.

use std::fmt;
use std::path::Path;

use glam::Vec3;
use hashbrown::{HashMap, HashSet};

use crate::entities::entities::SceneGraph;
use crate::entities::shape::Shape;
use crate::entities::transform::{NodeId, TransformNode};
use crate::environment::error::HierarchyError;
use crate::render::types::Color;
use crate::utils::{round_hundredths, FileUtils};

#[derive(Debug, Clone, PartialEq)]
pub struct JointRecord {
    pub name: String,
    pub rotation: Vec3,
    //Local position, relative to the parent.
    pub position: Vec3,
    pub parent: Option<String>,
}

impl fmt::Display for JointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "create -joint {} -rotate <{}> -translate <{}> -parent {};",
            self.name,
            FormattedVec3(self.rotation),
            FormattedVec3(self.position),
            self.parent.as_deref().unwrap_or("")
        )
    }
}

struct FormattedVec3(Vec3);

impl fmt::Display for FormattedVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            round_hundredths(self.0.x),
            round_hundredths(self.0.y),
            round_hundredths(self.0.z)
        )
    }
}

impl JointRecord {
    /// Parses a single line. `line` is the 1-based line number used in errors.
    pub fn parse(text: &str, line: usize) -> Result<JointRecord, HierarchyError> {
        let malformed = |reason: &str| HierarchyError::Malformed { line, reason: reason.to_string() };

        let text = text.trim();
        let text = text.strip_suffix(';').ok_or_else(|| malformed("missing ';'"))?;
        let tokens: Vec<&str> = text.split_whitespace().collect();

        if tokens.len() < 3 || tokens[0] != "create" || tokens[1] != "-joint" {
            return Err(malformed("expected 'create -joint <name>'"));
        }
        let name = tokens[2].to_string();

        let position_of = |flag: &str| tokens.iter().position(|t| *t == flag);
        let rotate = position_of("-rotate").ok_or_else(|| malformed("missing -rotate"))?;
        let translate = position_of("-translate").ok_or_else(|| malformed("missing -translate"))?;
        let parent = position_of("-parent").ok_or_else(|| malformed("missing -parent"))?;

        if !(2 < rotate && rotate < translate && translate < parent) {
            return Err(malformed("flags out of order"));
        }

        let rotation = parse_vec3(&tokens[rotate + 1..translate]).ok_or_else(|| malformed("bad -rotate vector"))?;
        let position =
            parse_vec3(&tokens[translate + 1..parent]).ok_or_else(|| malformed("bad -translate vector"))?;

        let parent = match &tokens[parent + 1..] {
            [] => None,
            [name] => Some(name.to_string()),
            _ => return Err(malformed("parent name contains whitespace")),
        };

        Ok(JointRecord { name, rotation, position, parent })
    }
}

//Accepts "<1, 2, 3>" however the whitespace was split.
fn parse_vec3(tokens: &[&str]) -> Option<Vec3> {
    let joined = tokens.join(" ");
    let inner = joined.trim().strip_prefix('<')?.strip_suffix('>')?;

    let values = inner.split(',').map(|v| v.trim().parse::<f32>().ok()).collect::<Option<Vec<f32>>>()?;

    match values.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Parses a whole file. Blank lines are skipped, names must be unique and every parent
/// must be defined on an earlier line.
pub fn parse(text: &str) -> Result<Vec<JointRecord>, HierarchyError> {
    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let record = JointRecord::parse(raw, line)?;

        if let Some(parent) = &record.parent {
            if !seen.contains(parent) {
                return Err(HierarchyError::UnknownParent { line, parent: parent.clone() });
            }
        }
        if !seen.insert(record.name.clone()) {
            return Err(HierarchyError::DuplicateName { line, name: record.name });
        }

        records.push(record);
    }

    Ok(records)
}

/// Records for every joint in scene order.
pub fn records(scene: &SceneGraph) -> Result<Vec<JointRecord>, HierarchyError> {
    let joints: Vec<JointRecord> = scene
        .joints()
        .map(|(_, node)| JointRecord {
            name: node.name.clone(),
            rotation: node.rotation,
            position: node.position,
            parent: node.parent().and_then(|p| scene.get(p)).map(|p| p.name.clone()),
        })
        .collect();

    if !joints.iter().any(|j| j.parent.is_none()) {
        return Err(HierarchyError::NoRoot);
    }
    Ok(joints)
}

pub fn to_text(records: &[JointRecord]) -> String {
    records.iter().map(|r| r.to_string()).collect::<Vec<String>>().join("\n")
}

/// Writes every joint of `scene` to `path`. Nothing is written when there is no root.
pub fn save(scene: &SceneGraph, path: &Path) -> Result<usize, HierarchyError> {
    let records = records(scene)?;
    std::fs::write(path, to_text(&records))?;

    log::info!("Saved {} joints to {}", records.len(), FileUtils::pts(path));
    Ok(records.len())
}

pub fn load(path: &Path) -> Result<Vec<JointRecord>, HierarchyError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Creates joints for already validated records, returning their ids in file order.
pub fn apply(records: &[JointRecord], scene: &mut SceneGraph, radius: f32) -> Vec<NodeId> {
    let mut by_name: HashMap<&str, NodeId> = HashMap::new();
    let mut created = Vec::with_capacity(records.len());

    for record in records {
        let joint = TransformNode::new(record.name.clone(), Shape::Joint { radius })
            .with_position(record.position)
            .with_rotation(record.rotation)
            .with_color(Color::BLUE);

        let id = scene.insert(joint);

        if let Some(parent) = record.parent.as_deref().and_then(|p| by_name.get(p)) {
            if let Err(e) = scene.add_child(*parent, id) {
                log::error!("Could not link {} to its parent. {}", record.name, e);
            }
        }

        by_name.insert(record.name.as_str(), id);
        created.push(id);
    }

    created
}
