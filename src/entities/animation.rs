use glam::Vec3;
use hashbrown::HashMap;

use crate::entities::entities::{Invalidation, SceneGraph};
use crate::entities::transform::NodeId;
use crate::environment::error::SceneError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    fn lerp_delta(&self, target: &Pose, frames: f32) -> Pose {
        Pose {
            position: (target.position - self.position) / frames,
            rotation: (target.rotation - self.rotation) / frames,
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    node: NodeId,
    start: Pose,
    end: Pose,
    delta: Pose,
    target: Pose,
}

/// Two-pose keyframe player.
///
/// Every tracked node moves from one recorded pose to the other along a cosine ease.
/// The eased increments are applied for twice the nominal frame count, which over the
/// whole run adds up to exactly one full delta per nominal frame.
pub struct Animator {
    frame_rate: f32,
    tracks: Vec<Track>,
    index: HashMap<NodeId, usize>,
    frame_number: u32,
    duration: f32,
}

impl Animator {
    pub fn new(frame_rate: f32) -> Self {
        Animator {
            frame_rate,
            tracks: Vec::new(),
            index: HashMap::new(),
            frame_number: 0,
            duration: 0.0,
        }
    }

    pub fn record_start(&mut self, scene: &SceneGraph, id: NodeId) -> Result<(), SceneError> {
        let pose = current_pose(scene, id)?;
        self.track(id, pose).start = pose;
        log::info!("Start keyframe saved for {}", node_name(scene, id));
        Ok(())
    }

    pub fn record_end(&mut self, scene: &SceneGraph, id: NodeId) -> Result<(), SceneError> {
        let pose = current_pose(scene, id)?;
        self.track(id, pose).end = pose;
        log::info!("End keyframe saved for {}", node_name(scene, id));
        Ok(())
    }

    //First sighting seeds both sides with the current pose.
    fn track(&mut self, id: NodeId, pose: Pose) -> &mut Track {
        let tracks = &mut self.tracks;
        let slot = *self.index.entry(id).or_insert_with(|| {
            tracks.push(Track { node: id, start: pose, end: pose, delta: ZERO_POSE, target: pose });
            tracks.len() - 1
        });
        &mut self.tracks[slot]
    }

    /// Snaps every tracked node to one keyframe and prepares the deltas toward the other.
    /// Restarting while a playback runs resets it.
    pub fn begin_playback(&mut self, scene: &mut SceneGraph, reverse: bool, half_duration: f32) {
        self.frame_number = 0;
        self.duration = half_duration;
        let frames = self.total_frames();

        for track in self.tracks.iter_mut() {
            let (from, to) = if reverse { (track.end, track.start) } else { (track.start, track.end) };

            if let Some(node) = scene.get_mut(track.node) {
                node.position = from.position;
                node.rotation = from.rotation;
            }

            track.delta = if frames >= 1.0 { from.lerp_delta(&to, frames) } else { ZERO_POSE };
            track.target = to;
        }

        log::info!(
            "{} playback of {} joints over {} frames",
            if reverse { "Reverse" } else { "Forward" },
            self.tracks.len(),
            frames
        );

        if frames < 1.0 {
            self.finish(scene);
        }
    }

    /// Applies one eased step. Returns whether playback should keep going.
    pub fn advance_frame(&mut self, scene: &mut SceneGraph) -> bool {
        let frames = self.total_frames();
        if frames < 1.0 {
            return false;
        }

        let e = self.easing();
        for track in self.tracks.iter() {
            if let Some(node) = scene.get_mut(track.node) {
                node.position += -track.delta.position * e;
                node.rotation += -track.delta.rotation * e;
            }
        }

        self.frame_number += 1;
        let playing = (self.frame_number as f32) < frames * 2.0;

        if !playing {
            self.finish(scene);
        }
        log::trace!("Frame {} e={}", self.frame_number, e);
        playing
    }

    //Absorbs float drift from summing the eased steps.
    fn finish(&self, scene: &mut SceneGraph) {
        for track in self.tracks.iter() {
            if let Some(node) = scene.get_mut(track.node) {
                node.position = track.target.position;
                node.rotation = track.target.rotation;
            }
        }
    }

    /// Easing coefficient for the current frame, 0 at the start and -1 at the nominal end.
    pub fn easing(&self) -> f32 {
        let frames = self.total_frames();
        if frames <= 0.0 {
            return -1.0;
        }
        ((std::f32::consts::PI * self.frame_number as f32 / frames).cos() - 1.0) / 2.0
    }

    /// Drops every track. Any structural edit makes the recorded poses meaningless.
    pub fn invalidate(&mut self, invalidation: &Invalidation) {
        log::debug!(
            "Clearing {} keyframe tracks after removing {:?}",
            self.tracks.len(),
            invalidation.removed
        );
        self.clear();
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index.clear();
        self.frame_number = 0;
    }

    pub fn is_tracked(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn start(&self, id: NodeId) -> Option<Pose> {
        self.index.get(&id).map(|i| self.tracks[*i].start)
    }

    pub fn end(&self, id: NodeId) -> Option<Pose> {
        self.index.get(&id).map(|i| self.tracks[*i].end)
    }

    pub fn tracked(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tracks.iter().map(|t| t.node)
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Nominal frame count of one playback, `frame_rate * duration`.
    pub fn total_frames(&self) -> f32 {
        self.frame_rate * self.duration
    }
}

const ZERO_POSE: Pose = Pose { position: Vec3::ZERO, rotation: Vec3::ZERO };

fn current_pose(scene: &SceneGraph, id: NodeId) -> Result<Pose, SceneError> {
    let node = scene.get(id).ok_or(SceneError::UnknownNode(id))?;
    Ok(Pose { position: node.position, rotation: node.rotation })
}

fn node_name(scene: &SceneGraph, id: NodeId) -> &str {
    scene.get(id).map(|n| n.name.as_str()).unwrap_or("?")
}
