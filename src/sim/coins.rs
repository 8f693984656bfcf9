//! Collectible coins: spawn cadence, culling, and player collision
//!
//! Coins live in world space. A new one appears just past the right screen
//! edge each time the scroll frontier crosses another `spacing` boundary while
//! walking forward. Collision is polled every frame, moving or not, since a
//! jump alone can collect a coin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{CoinId, EngineEvent};
use crate::tuning::{CoinTuning, PlayerTuning};

/// A live coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: CoinId,
    /// World x of the left edge, screen y of the top edge
    pub pos: Vec2,
}

impl Coin {
    #[inline]
    pub fn screen_x(&self, scroll_position: f32) -> f32 {
        self.pos.x + scroll_position
    }
}

/// Bookkeeping for where the last coin was spawned
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnFrontier {
    pub last_segment: i64,
    pub next_offset_index: usize,
}

impl SpawnFrontier {
    pub fn at(scroll_position: f32, spacing: f32) -> Self {
        Self {
            last_segment: segment_of(scroll_position, spacing),
            next_offset_index: 0,
        }
    }
}

/// Segment index of a scroll position (grows while walking forward)
#[inline]
pub fn segment_of(scroll_position: f32, spacing: f32) -> i64 {
    (scroll_position / -spacing).floor() as i64
}

/// Player hitbox inputs for one collision check
#[derive(Debug, Clone, Copy)]
pub struct PlayerBox {
    pub x: f32,
    pub width: f32,
    /// Grounded top-edge y
    pub ground_y: f32,
    pub jumping: bool,
    pub jump_offset: f32,
}

impl PlayerBox {
    pub fn from_tuning(tuning: &PlayerTuning, jumping: bool) -> Self {
        Self {
            x: tuning.screen_x,
            width: tuning.width,
            ground_y: tuning.ground_y,
            jumping,
            jump_offset: tuning.jump_collision_offset,
        }
    }

    fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    fn top(&self) -> f32 {
        if self.jumping {
            self.ground_y - self.jump_offset
        } else {
            self.ground_y
        }
    }
}

/// Horizontal overlap plus one-sided vertical containment: the player's edge
/// must reach at or above the coin's visible bottom.
pub fn check_collision(coin: &Coin, scroll_position: f32, player: &PlayerBox, tuning: &CoinTuning) -> bool {
    let coin_center_x = coin.screen_x(scroll_position) + tuning.size / 2.0;
    let overlap_x = (player.center_x() - coin_center_x).abs() < (player.width + tuning.size) / 2.0;

    let coin_bottom = coin.pos.y - tuning.whitespace;
    let overlap_y = player.top() <= coin_bottom;

    overlap_x && overlap_y
}

/// Live coin collection, in spawn order
#[derive(Debug, Clone)]
pub struct CoinField {
    tuning: CoinTuning,
    frontier: SpawnFrontier,
    coins: Vec<Coin>,
    collected: u32,
}

impl CoinField {
    pub fn new(tuning: &CoinTuning, scroll_position: f32) -> Self {
        Self {
            tuning: tuning.clone(),
            frontier: SpawnFrontier::at(scroll_position, tuning.spacing),
            coins: Vec::new(),
            collected: 0,
        }
    }

    /// Cull stale coins, then spawn one just past the right edge if a new
    /// segment was reached walking forward.
    pub fn maybe_spawn(
        &mut self,
        scroll_position: f32,
        moving_backward: bool,
        screen_width: f32,
        ground_y: f32,
    ) -> Option<Coin> {
        self.cull(scroll_position, screen_width);

        let segment = segment_of(scroll_position, self.tuning.spacing);
        if moving_backward || segment <= self.frontier.last_segment {
            return None;
        }

        let offsets = &self.tuning.y_offsets;
        let offset = offsets
            .get(self.frontier.next_offset_index % offsets.len().max(1))
            .copied()
            .unwrap_or(0.0);
        self.frontier.next_offset_index = (self.frontier.next_offset_index + 1) % offsets.len().max(1);
        self.frontier.last_segment = segment;

        let coin = Coin {
            id: CoinId(segment as u64),
            pos: Vec2::new(-scroll_position + screen_width, ground_y + offset),
        };
        debug_assert!(
            self.coins.iter().all(|c| c.id != coin.id),
            "duplicate coin id {:?}",
            coin.id
        );
        self.coins.push(coin);
        log::debug!("Spawned coin {:?} at x={:.0}", coin.id, coin.pos.x);
        Some(coin)
    }

    /// Drop coins far behind the frontier
    pub fn cull(&mut self, scroll_position: f32, screen_width: f32) {
        let limit = -scroll_position - screen_width * self.tuning.cull_factor;
        self.coins.retain(|c| c.pos.x > limit);
    }

    /// Poll every visible coin against the player; collected coins are removed
    /// immediately so none can fire twice.
    pub fn collect_hits(
        &mut self,
        scroll_position: f32,
        screen_width: f32,
        player: &PlayerBox,
        events: &mut Vec<EngineEvent>,
    ) -> usize {
        let tuning = &self.tuning;
        let margin = tuning.visible_margin;
        let before = self.coins.len();
        self.coins.retain(|coin| {
            let sx = coin.screen_x(scroll_position);
            let visible = sx > -margin && sx < screen_width + margin;
            if visible && check_collision(coin, scroll_position, player, tuning) {
                log::debug!("Collected coin {:?}", coin.id);
                events.push(EngineEvent::CoinCollected { id: coin.id });
                false
            } else {
                true
            }
        });
        let hits = before - self.coins.len();
        self.collected += hits as u32;
        hits
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Coins within the visible window (plus margin)
    pub fn visible(&self, scroll_position: f32, screen_width: f32) -> impl Iterator<Item = &Coin> {
        let margin = self.tuning.visible_margin;
        self.coins.iter().filter(move |c| {
            let sx = c.screen_x(scroll_position);
            sx > -margin && sx < screen_width + margin
        })
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn frontier(&self) -> SpawnFrontier {
        self.frontier
    }
}
