use game_types::{
    GameError, Player, PlayerConfig, PlayerId, Role, WordPair, color_index_for_seat, sanitize_name,
};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::RoleCounts;

pub struct RoleAllocator;

impl RoleAllocator {
    /// Shuffled role per seat: `counts` specials, civilians everywhere else.
    pub fn allocate_roles<R: Rng + ?Sized>(
        player_count: usize,
        counts: RoleCounts,
        rng: &mut R,
    ) -> Result<Vec<Role>, GameError> {
        let specials = counts.undercover + counts.mister_white;
        if specials > player_count {
            return Err(GameError::RoleAllocation {
                reason: format!(
                    "{} undercover and {} Mister White do not fit {} seats",
                    counts.undercover, counts.mister_white, player_count
                ),
            });
        }

        let mut roles = Vec::with_capacity(player_count);
        roles.extend(std::iter::repeat_n(Role::Undercover, counts.undercover));
        roles.extend(std::iter::repeat_n(Role::MisterWhite, counts.mister_white));
        roles.extend(std::iter::repeat_n(Role::Civil, player_count - specials));

        roles.shuffle(rng);
        Ok(roles)
    }

    /// Seat each config with its role and card.
    ///
    /// Fresh players start at zero points with a random id; carrying scores and
    /// ids across rounds is the caller's job.
    pub fn assign_players<R: Rng + ?Sized>(
        configs: &[PlayerConfig],
        roles: &[Role],
        word_pair: &WordPair,
        rng: &mut R,
    ) -> Result<Vec<Player>, GameError> {
        if configs.len() != roles.len() {
            return Err(GameError::RoleAllocation {
                reason: format!("{} players but {} roles", configs.len(), roles.len()),
            });
        }

        let players = configs
            .iter()
            .zip(roles)
            .enumerate()
            .map(|(seat, (config, &role))| Player {
                id: new_player_id(rng),
                name: sanitize_name(&config.name),
                role,
                word: word_pair.word_for(role).map(str::to_string),
                profile_image: config.profile_image.clone(),
                score: 0,
                is_eliminated: false,
                has_seen_word: false,
                color_index: color_index_for_seat(seat),
            })
            .collect();

        Ok(players)
    }
}

/// Random v4 id drawn from the session RNG, so seeded sessions replay identically.
pub fn new_player_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn count(roles: &[Role], role: Role) -> usize {
        roles.iter().filter(|&&r| r == role).count()
    }

    #[test]
    fn test_allocate_roles_multiset() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roles = RoleAllocator::allocate_roles(8, RoleCounts::new(2, 1), &mut rng).unwrap();
        assert_eq!(roles.len(), 8);
        assert_eq!(count(&roles, Role::Undercover), 2);
        assert_eq!(count(&roles, Role::MisterWhite), 1);
        assert_eq!(count(&roles, Role::Civil), 5);
    }

    #[test]
    fn test_allocate_roles_rejects_overflow() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = RoleAllocator::allocate_roles(3, RoleCounts::new(3, 1), &mut rng);
        assert!(matches!(result, Err(GameError::RoleAllocation { .. })));
    }

    #[test]
    fn test_allocate_roles_shuffles_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut undercover_seats = std::collections::HashSet::new();
        for _ in 0..200 {
            let roles = RoleAllocator::allocate_roles(6, RoleCounts::new(1, 0), &mut rng).unwrap();
            let seat = roles.iter().position(|&r| r == Role::Undercover).unwrap();
            undercover_seats.insert(seat);
        }
        assert_eq!(undercover_seats.len(), 6, "undercover never landed on some seats");
    }

    #[test]
    fn test_assign_players_words_follow_roles() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let configs: Vec<PlayerConfig> = ["Alice", "Bob", "Carol", "Dave", "Eve"]
            .iter()
            .map(|n| PlayerConfig::new(*n))
            .collect();
        let roles = [Role::Civil, Role::Undercover, Role::Civil, Role::MisterWhite, Role::Civil];
        let pair = WordPair::new("Soleil", "Lune");

        let players = RoleAllocator::assign_players(&configs, &roles, &pair, &mut rng).unwrap();

        assert_eq!(players.len(), 5);
        for (seat, player) in players.iter().enumerate() {
            assert_eq!(player.role, roles[seat]);
            assert_eq!(player.color_index, seat as u8 + 1);
            assert_eq!(player.score, 0);
            assert!(!player.is_eliminated);
            assert!(!player.has_seen_word);
            match player.role {
                Role::Civil => assert_eq!(player.word.as_deref(), Some("Soleil")),
                Role::Undercover => assert_eq!(player.word.as_deref(), Some("Lune")),
                Role::MisterWhite => assert!(player.word.is_none()),
            }
        }
        let ids: std::collections::HashSet<_> = players.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_assign_players_sanitizes_names_and_keeps_images() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let configs = vec![
            PlayerConfig::new("  A very long player name  ").with_image("data:image/png;base64,AAAA"),
            PlayerConfig::new("Bob"),
        ];
        let pair = WordPair::new("Pluie", "Orage");
        let players =
            RoleAllocator::assign_players(&configs, &[Role::Civil, Role::Undercover], &pair, &mut rng)
                .unwrap();

        assert_eq!(players[0].name, "A very long play");
        assert_eq!(players[0].profile_image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(players[1].profile_image.is_none());
    }

    #[test]
    fn test_assign_players_length_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let configs = vec![PlayerConfig::new("Alice")];
        let pair = WordPair::new("Pluie", "Orage");
        let result = RoleAllocator::assign_players(&configs, &[], &pair, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        let id = new_player_id(&mut a);
        assert_eq!(id, new_player_id(&mut b));
        assert_eq!(id.get_version_num(), 4);
    }
}
