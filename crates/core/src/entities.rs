//! Entity store - decoded games and players keyed by id
//!
//! Fed by the snapshot stream. Besides lookups it answers the two questions
//! the client asks of the whole population:
//!
//! | Query | Rule |
//! |-------|------|
//! | [`EntityStore::latest_game_for`] | highest game id owned by the player |
//! | [`EntityStore::leaderboard`] | existing games, score descending, ties by id |

use std::collections::BTreeMap;

use crate::snapshot::{normalize_felt, GameModel, PlayerModel};

/// Rows per leaderboard page
pub const LEADERBOARD_PAGE_SIZE: usize = 8;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry<'a> {
    /// 1-based
    pub rank: usize,
    pub game: &'a GameModel,
    pub player: Option<&'a PlayerModel>,
}

impl LeaderboardEntry<'_> {
    pub fn player_name(&self) -> &str {
        match self.player {
            Some(player) if player.exists() => &player.name,
            _ => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    games: BTreeMap<u32, GameModel>,
    players: BTreeMap<String, PlayerModel>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a game; returns the previous record
    pub fn upsert_game(&mut self, game: GameModel) -> Option<GameModel> {
        self.games.insert(game.id, game)
    }

    pub fn upsert_player(&mut self, player: PlayerModel) -> Option<PlayerModel> {
        self.players.insert(player.id.clone(), player)
    }

    pub fn game(&self, id: u32) -> Option<&GameModel> {
        self.games.get(&id)
    }

    pub fn player(&self, id: &str) -> Option<&PlayerModel> {
        self.players.get(&normalize_felt(id))
    }

    pub fn games(&self) -> impl Iterator<Item = &GameModel> {
        self.games.values()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerModel> {
        self.players.values()
    }

    /// The player's most recent game (highest id), if any
    pub fn latest_game_for(&self, player_id: &str) -> Option<&GameModel> {
        let key = normalize_felt(player_id);
        self.games
            .values()
            .rev()
            .find(|game| game.exists() && game.player_id == key)
    }

    /// All existing games ranked by score
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry<'_>> {
        let mut ranked: Vec<&GameModel> = self.games.values().filter(|g| g.exists()).collect();
        // BTreeMap order is ascending id and sort_by is stable
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, game)| LeaderboardEntry {
                rank: i + 1,
                game,
                player: self.players.get(&game.player_id),
            })
            .collect()
    }

    /// Zero-based page of [`leaderboard`](Self::leaderboard); past the end is empty
    pub fn leaderboard_page(&self, page: usize) -> Vec<LeaderboardEntry<'_>> {
        self.leaderboard()
            .into_iter()
            .skip(page.saturating_mul(LEADERBOARD_PAGE_SIZE))
            .take(LEADERBOARD_PAGE_SIZE)
            .collect()
    }

    pub fn leaderboard_pages(&self) -> usize {
        let count = self.games.values().filter(|g| g.exists()).count();
        count.div_ceil(LEADERBOARD_PAGE_SIZE)
    }
}
