//! Semantic plane projection.
//!
//! Maps a word onto a bounded 2D board coordinate using its embedding
//! similarity to four anchor words: nature/mechanic span the X axis,
//! living/object span the Y axis. Raw similarity differences cluster tightly
//! around zero, so each axis is clamped, normalized, and run through a
//! signed power-law spread that expands values near the origin without
//! changing sign or relative order.
//!
//! Also hosts the counter-word search: ranking a candidate list by how
//! directly each candidate's projected position opposes a given center of
//! mass.

use bevy::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::embedding::EmbeddingProvider;

/// The four anchor words defining the semantic axes.
///
/// All four should resolve in the embedding provider; if any does not, every
/// projection against this set comes back unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSet {
    /// Positive X endpoint.
    pub nature_word: String,
    /// Negative X endpoint.
    pub mechanic_word: String,
    /// Positive Y endpoint.
    pub living_word: String,
    /// Negative Y endpoint.
    pub object_word: String,
}

impl AnchorSet {
    pub fn new(nature: &str, mechanic: &str, living: &str, object: &str) -> Self {
        Self {
            nature_word: nature.to_lowercase(),
            mechanic_word: mechanic.to_lowercase(),
            living_word: living.to_lowercase(),
            object_word: object.to_lowercase(),
        }
    }
}

impl Default for AnchorSet {
    fn default() -> Self {
        Self::new("nature", "machine", "life", "object")
    }
}

/// Tunable projection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Clamp magnitude for raw similarity differences. Zero disables
    /// normalization entirely (axis maps to 0) rather than dividing by zero.
    pub clamp_magnitude: f32,
    /// Spread exponent in (0, 1]; smaller = more spread near the origin.
    pub spread_exponent: f32,
    /// Uniform scale applied by `scaled_project` when no override is given.
    pub position_scale: f32,
    /// Candidate pool for the counter-word search.
    pub candidate_words: Vec<String>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            clamp_magnitude: SIMILARITY_CLAMP,
            spread_exponent: SPREAD_EXPONENT,
            position_scale: DEFAULT_POSITION_SCALE,
            candidate_words: vec![],
        }
    }
}

/// A word's position on the semantic plane, both components in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticCoordinate {
    pub x: f32,
    pub y: f32,
}

impl SemanticCoordinate {
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Display copy for minimaps: a second spread pass pushes mid-range
    /// points outward so the overview reads well. Stays in [-1, 1] and is
    /// kept distinct from the raw coordinate the physics layer consumes.
    pub fn minimap_point(self) -> Vec2 {
        Vec2::new(
            spread(self.x, MINIMAP_SPREAD_EXPONENT),
            spread(self.y, MINIMAP_SPREAD_EXPONENT),
        )
    }
}

/// Signed power-law spread: `sign(v) * |v|^exponent`. Order- and
/// sign-preserving for inputs in [-1, 1].
fn spread(v: f32, exponent: f32) -> f32 {
    if v == 0.0 {
        0.0
    } else {
        v.signum() * v.abs().powf(exponent)
    }
}

/// Stateless word -> coordinate mapper. Owns no mutable state; every result
/// is a pure function of the provider and the config.
pub struct SemanticProjector<P: EmbeddingProvider> {
    provider: P,
    config: ProjectionConfig,
}

impl<P: EmbeddingProvider> SemanticProjector<P> {
    pub fn new(provider: P, config: ProjectionConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Swap the tunable parameters (hot reload); the provider stays.
    pub fn set_config(&mut self, config: ProjectionConfig) {
        self.config = config;
    }

    /// Project a word onto the semantic plane.
    ///
    /// Words are matched case-sensitively; callers lowercase before calling.
    /// Returns `None` when the word or any anchor word is out of vocabulary
    /// - the single failure mode, handled by rejecting the drop upstream.
    pub fn project(&self, word: &str, anchors: &AnchorSet) -> Option<SemanticCoordinate> {
        let sim_nature = self.provider.similarity(word, &anchors.nature_word)?;
        let sim_mechanic = self.provider.similarity(word, &anchors.mechanic_word)?;
        let sim_living = self.provider.similarity(word, &anchors.living_word)?;
        let sim_object = self.provider.similarity(word, &anchors.object_word)?;

        Some(SemanticCoordinate {
            x: self.normalize_axis(sim_nature - sim_mechanic),
            y: self.normalize_axis(sim_living - sim_object),
        })
    }

    /// `project`, then a uniform scale. The scale is decoupled from the
    /// clamp/spread so physical board size can be tuned independently of
    /// semantic clustering behavior.
    pub fn scaled_project(
        &self,
        word: &str,
        anchors: &AnchorSet,
        scale: f32,
    ) -> Option<SemanticCoordinate> {
        let coord = self.project(word, anchors)?;
        Some(SemanticCoordinate {
            x: coord.x * scale,
            y: coord.y * scale,
        })
    }

    /// Rank candidate words by how well their projected position opposes the
    /// given center of mass, best first. Candidates that fail to project or
    /// project onto (near) the origin are skipped. Ties keep input order;
    /// the result is truncated to `limit`.
    ///
    /// One-step greedy: the score ignores what the board will look like
    /// after the candidate actually lands.
    pub fn counter_words(
        &self,
        center_of_mass: Vec2,
        anchors: &AnchorSet,
        candidates: &[String],
        limit: usize,
    ) -> Vec<String> {
        let target = -center_of_mass;
        let balanced = target.length() < ZERO_MAGNITUDE_EPSILON;

        let mut scored: Vec<(usize, f32)> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(index, word)| {
                let position = self.project(word, anchors)?.as_vec2();
                let score = if balanced {
                    // No direction is preferred on a balanced board; favor
                    // candidates that land near the center.
                    1.0 - position.length().min(1.0)
                } else {
                    if position.length() < ZERO_MAGNITUDE_EPSILON {
                        return None;
                    }
                    position.normalize().dot(target.normalize())
                };
                Some((index, score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(limit)
            .map(|(index, _)| candidates[index].clone())
            .collect()
    }

    /// Clamp a raw similarity difference, normalize it to [-1, 1], and apply
    /// the spread. A zero clamp magnitude disables normalization.
    fn normalize_axis(&self, raw: f32) -> f32 {
        let clamp = self.config.clamp_magnitude;
        if clamp <= f32::EPSILON {
            return 0.0;
        }
        let linear = raw.clamp(-clamp, clamp) / clamp;
        spread(linear, self.config.spread_exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FixedVectorProvider;

    /// Anchor vectors at the four compass points, plus probe words. The
    /// third dimension lets "pebble" be orthogonal to every anchor, which
    /// is what actually lands a word on the board center (cosine ignores
    /// magnitude).
    fn axis_provider() -> FixedVectorProvider {
        FixedVectorProvider::new(vec![
            ("nature", vec![1.0, 0.0, 0.0]),
            ("machine", vec![-1.0, 0.0, 0.0]),
            ("life", vec![0.0, 1.0, 0.0]),
            ("object", vec![0.0, -1.0, 0.0]),
            ("left", vec![-1.0, 0.0, 0.0]),
            ("right", vec![1.0, 0.0, 0.0]),
            ("forest", vec![1.0, 0.5, 0.0]),
            ("engine", vec![-1.0, 0.5, 0.0]),
            ("pebble", vec![0.0, 0.0, 1.0]),
            ("west", vec![-1.0, 0.0, 0.0]),
        ])
    }

    fn projector() -> SemanticProjector<FixedVectorProvider> {
        SemanticProjector::new(axis_provider(), ProjectionConfig::default())
    }

    #[test]
    fn test_project_deterministic() {
        let p = projector();
        let anchors = AnchorSet::default();
        let a = p.project("forest", &anchors).unwrap();
        let b = p.project("forest", &anchors).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_project_bounded() {
        let p = projector();
        let anchors = AnchorSet::default();
        for word in ["left", "right", "forest", "engine", "pebble"] {
            let coord = p.project(word, &anchors).unwrap();
            assert!(
                (-1.0..=1.0).contains(&coord.x) && (-1.0..=1.0).contains(&coord.y),
                "{word} projected out of bounds: ({}, {})",
                coord.x,
                coord.y
            );
        }
    }

    #[test]
    fn test_quadrants() {
        let p = projector();
        let anchors = AnchorSet::default();

        // More nature-like, more living-like.
        let forest = p.project("forest", &anchors).unwrap();
        assert!(forest.x > 0.0 && forest.y > 0.0, "got ({}, {})", forest.x, forest.y);

        // More mechanic-like, more living-like.
        let engine = p.project("engine", &anchors).unwrap();
        assert!(engine.x < 0.0 && engine.y > 0.0, "got ({}, {})", engine.x, engine.y);
    }

    #[test]
    fn test_unknown_word_is_none() {
        let p = projector();
        assert!(p.project("zxqv", &AnchorSet::default()).is_none());
    }

    #[test]
    fn test_unknown_anchor_is_none() {
        let p = projector();
        let anchors = AnchorSet::new("nature", "machine", "life", "zxqv");
        assert!(p.project("forest", &anchors).is_none());
    }

    #[test]
    fn test_spread_expands_near_origin() {
        // 0.1^0.55 > 0.1: small linear values move outward.
        assert!(spread(0.1, SPREAD_EXPONENT) > 0.1);
        assert!(spread(-0.1, SPREAD_EXPONENT) < -0.1);
        // Endpoints are fixed.
        assert!((spread(1.0, SPREAD_EXPONENT) - 1.0).abs() < f32::EPSILON);
        assert_eq!(spread(0.0, SPREAD_EXPONENT), 0.0);
    }

    #[test]
    fn test_spread_monotonic() {
        let mut prev = 0.0;
        for i in 1..=10 {
            let v = i as f32 / 10.0;
            let s = spread(v, SPREAD_EXPONENT);
            assert!(s > prev, "spread not monotonic at {v}: {s} <= {prev}");
            prev = s;
        }
    }

    #[test]
    fn test_zero_clamp_disables_normalization() {
        let config = ProjectionConfig {
            clamp_magnitude: 0.0,
            ..Default::default()
        };
        let p = SemanticProjector::new(axis_provider(), config);
        let coord = p.project("forest", &AnchorSet::default()).unwrap();
        assert_eq!((coord.x, coord.y), (0.0, 0.0));
    }

    #[test]
    fn test_scaled_project() {
        let p = projector();
        let anchors = AnchorSet::default();
        let base = p.project("forest", &anchors).unwrap();
        let scaled = p.scaled_project("forest", &anchors, 3.0).unwrap();
        assert!((scaled.x - base.x * 3.0).abs() < 1e-6);
        assert!((scaled.y - base.y * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_counter_words_opposes_lean() {
        let p = projector();
        let anchors = AnchorSet::default();
        let candidates = vec!["left".to_string(), "right".to_string()];

        // Tower leaning fully toward nature (+X): "left" must rank first.
        let ranked = p.counter_words(Vec2::new(1.0, 0.0), &anchors, &candidates, 2);
        assert_eq!(ranked[0], "left");
    }

    #[test]
    fn test_counter_words_balanced_prefers_center() {
        let p = projector();
        let anchors = AnchorSet::default();
        let candidates = vec!["right".to_string(), "pebble".to_string()];

        let ranked = p.counter_words(Vec2::ZERO, &anchors, &candidates, 2);
        assert_eq!(
            ranked[0], "pebble",
            "Balanced board should prefer near-origin candidates"
        );
    }

    #[test]
    fn test_counter_words_skips_unknown_and_degenerate() {
        let p = projector();
        let anchors = AnchorSet::default();
        // "zxqv" does not resolve; "pebble" projects onto the origin and has
        // no direction to score against.
        let candidates = vec!["zxqv".to_string(), "pebble".to_string(), "left".to_string()];
        let ranked = p.counter_words(Vec2::new(1.0, 0.0), &anchors, &candidates, 5);
        assert_eq!(ranked, vec!["left".to_string()]);
    }

    #[test]
    fn test_counter_words_limit_and_tie_order() {
        let p = projector();
        let anchors = AnchorSet::default();
        // "west" and "left" project identically; input order breaks the tie.
        let candidates = vec!["west".to_string(), "left".to_string(), "right".to_string()];
        let ranked = p.counter_words(Vec2::new(1.0, 0.0), &anchors, &candidates, 2);
        assert_eq!(ranked, vec!["west".to_string(), "left".to_string()]);
    }

    #[test]
    fn test_minimap_point_bounded() {
        let coord = SemanticCoordinate { x: 0.3, y: -0.9 };
        let point = coord.minimap_point();
        assert!(point.x.abs() <= 1.0 && point.y.abs() <= 1.0);
        // Same signs, pushed outward.
        assert!(point.x > 0.3);
        assert!(point.y < -0.9);
    }
}
