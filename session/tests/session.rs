use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wumpus_core::{
    ActionError, Command, DeathCause, Difficulty, Hazard, HazardKind, MoveError, Outcome, RoomId,
    ShotError,
};
use wumpus_session::{ArrowAllowance, GameSession, Phase, Settings, ShotReport};
use wumpus_world::{self as world, World};

fn room(value: u8) -> RoomId {
    RoomId::new(value)
}

fn settings(difficulty: u8, arrows: u8) -> Settings {
    Settings {
        difficulty: Difficulty::new(difficulty).expect("valid difficulty"),
        arrows: ArrowAllowance::Fixed(arrows),
        seed: None,
    }
}

fn cave(wumpus: u8, player: u8, hazards: &[(u8, HazardKind)]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceWumpus { room: room(wumpus) }, &mut events);
    for &(target, kind) in hazards {
        world::apply(
            &mut world,
            Command::PlaceHazard {
                room: room(target),
                kind,
            },
            &mut events,
        );
    }
    world::apply(&mut world, Command::PlacePlayer { room: room(player) }, &mut events);
    world
}

fn session(world: World, settings: Settings, seed: u64) -> GameSession {
    GameSession::from_world(world, settings, ChaCha8Rng::seed_from_u64(seed))
}

#[test]
fn quiet_move_counts_once_and_keeps_the_hunt_going() {
    let mut session = session(cave(14, 1, &[]), settings(3, 2), 0);
    assert_eq!(session.neighbors(), &[room(2), room(5), room(8)]);

    let report = session.submit_move(room(5)).expect("legal move");

    assert_eq!(report.entered, room(5));
    assert_eq!(report.carried_to, None);
    assert!(!report.escaped_wumpus);
    assert_eq!(report.aftermath.wumpus_moved, None);
    assert_eq!(report.aftermath.outcome, Outcome::InProgress);
    assert_eq!(session.current_room(), room(5));
    assert_eq!(session.moves(), 1);
    assert_eq!(session.outcome(), Outcome::InProgress);
}

#[test]
fn rejected_moves_change_nothing() {
    let mut session = session(cave(14, 1, &[]), settings(3, 2), 0);

    assert_eq!(
        session.submit_move(room(14)),
        Err(ActionError::InvalidMove(MoveError::NotAdjacent {
            from: room(1),
            to: room(14),
        }))
    );
    assert_eq!(
        session.submit_move(room(1)),
        Err(ActionError::InvalidMove(MoveError::SameRoom { room: room(1) }))
    );
    assert_eq!(session.current_room(), room(1));
    assert_eq!(session.moves(), 0);
}

#[test]
fn hints_describe_the_rooms_next_door() {
    let session = session(
        cave(2, 1, &[(5, HazardKind::Bats), (9, HazardKind::Pit)]),
        settings(3, 2),
        0,
    );

    let hints = session.hazard_hints();

    assert!(hints.wumpus);
    assert!(hints.bats);
    assert!(!hints.pit);
}

#[test]
fn walking_into_a_pit_ends_the_hunt() {
    let mut session = session(cave(14, 1, &[(8, HazardKind::Pit)]), settings(1, 2), 0);

    let report = session.submit_move(room(8)).expect("legal move");

    let lost = Outcome::PlayerDead {
        cause: DeathCause::Pit,
    };
    assert_eq!(report.aftermath.outcome, lost);
    assert_eq!(session.phase(), Phase::Ended(lost));
    assert_eq!(session.submit_move(room(1)), Err(ActionError::SessionEnded));
    assert_eq!(session.begin_shot(), Err(ActionError::SessionEnded));
}

#[test]
fn bats_drop_the_player_somewhere_safe() {
    for seed in 0..32 {
        let mut session = session(cave(20, 1, &[(5, HazardKind::Bats)]), settings(3, 2), seed);

        let report = session.submit_move(room(5)).expect("legal move");

        let landed = report.carried_to.expect("bats always carry");
        assert_eq!(session.current_room(), landed);
        assert_ne!(landed, room(5));
        assert_ne!(landed, room(20));
        assert_eq!(report.aftermath.outcome, Outcome::InProgress);
    }
}

#[test]
fn wandering_does_not_count_as_a_move() {
    let mut session = session(cave(20, 1, &[]), settings(5, 2), 4);

    let report = session.submit_move(room(2)).expect("legal move");

    let moved = report.aftermath.wumpus_moved.expect("wumpus wanders at 5");
    assert!([room(13), room(16), room(19)].contains(&moved));
    assert_eq!(session.moves(), 1);
}

#[test]
fn shot_path_is_checked_before_the_arrow_leaves() {
    let mut session = session(cave(4, 1, &[]), settings(3, 2), 0);

    assert_eq!(
        session.submit_shot_path([room(2), room(3), room(7)]),
        Err(ActionError::InvalidShotHop {
            hop: 3,
            reason: ShotError::NotAdjacent {
                from: room(3),
                to: room(7),
            },
        })
    );
    assert_eq!(session.arrows(), 2);
    assert_eq!(session.moves(), 0);
    assert_eq!(session.phase(), Phase::AwaitingAction);
}

#[test]
fn arrow_through_the_wumpus_wins() {
    let mut session = session(cave(4, 1, &[]), settings(3, 2), 0);

    let report = session
        .submit_shot_path([room(2), room(3), room(4)])
        .expect("valid path");

    assert_eq!(report, ShotReport::Hit);
    assert_eq!(session.outcome(), Outcome::WumpusDead);
    assert_eq!(session.arrows(), 1);
    assert_eq!(session.moves(), 1);
}

#[test]
fn returning_arrow_kills_the_shooter() {
    let mut session = session(cave(20, 1, &[]), settings(3, 2), 0);

    let report = session
        .submit_shot_path([room(5), room(1), room(2)])
        .expect("valid path");

    assert_eq!(report, ShotReport::SelfShot);
    assert_eq!(
        session.outcome(),
        Outcome::PlayerDead {
            cause: DeathCause::SelfShot
        }
    );
}

#[test]
fn aiming_hop_by_hop_retries_bad_rooms() {
    let mut session = session(cave(20, 1, &[]), settings(3, 2), 0);
    assert_eq!(session.aim(room(2)), Err(ActionError::NotAiming));

    session.begin_shot().expect("arrow available");
    assert_eq!(session.phase(), Phase::Aiming { hop: 1 });
    assert_eq!(session.arrows(), 1);
    assert_eq!(session.moves(), 1);
    assert_eq!(session.submit_move(room(2)), Err(ActionError::AlreadyAiming));

    assert_eq!(
        session.aim(room(7)),
        Err(ActionError::InvalidShotHop {
            hop: 1,
            reason: ShotError::NotAdjacent {
                from: room(1),
                to: room(7),
            },
        })
    );
    assert_eq!(
        session.aim(room(2)),
        Ok(ShotReport::InFlight {
            room: room(2),
            hops_left: 2,
        })
    );
    assert_eq!(session.phase(), Phase::Aiming { hop: 2 });
    assert_eq!(session.arrow_room(), Some(room(2)));

    let _ = session.aim(room(3)).expect("legal hop");
    let last = session.aim(room(4)).expect("legal hop");

    assert!(matches!(last, ShotReport::Missed { .. }));
    assert_eq!(session.phase(), Phase::AwaitingAction);
    assert_eq!(session.moves(), 1);
}

#[test]
fn last_arrow_missing_ends_the_hunt() {
    let mut session = session(cave(20, 1, &[]), settings(3, 1), 0);

    let report = session
        .submit_shot_path([room(2), room(3), room(4)])
        .expect("valid path");

    let lost = Outcome::PlayerDead {
        cause: DeathCause::OutOfArrows,
    };
    assert!(matches!(
        report,
        ShotReport::Missed { aftermath } if aftermath.outcome == lost
    ));
    assert_eq!(session.arrows(), 0);
    assert_eq!(session.begin_shot(), Err(ActionError::SessionEnded));
}

#[test]
fn wumpus_wanders_before_the_quiver_is_judged() {
    let mut caught = 0;
    for seed in 0..64 {
        let mut session = session(cave(2, 1, &[]), settings(5, 1), seed);

        let report = session
            .submit_shot_path([room(5), room(4), room(3)])
            .expect("valid path");

        let ShotReport::Missed { aftermath } = report else {
            panic!("seed {seed}: the arrow never reaches room 2");
        };
        match aftermath.outcome {
            Outcome::PlayerDead {
                cause: DeathCause::Wumpus,
            } => {
                caught += 1;
                assert_eq!(aftermath.wumpus_moved, Some(room(1)));
            }
            Outcome::PlayerDead {
                cause: DeathCause::OutOfArrows,
            } => {}
            other => panic!("seed {seed}: unexpected outcome {other:?}"),
        }
    }
    assert!(caught > 0, "the wumpus never wandered into the player");
}

#[test]
fn empty_quiver_refuses_to_shoot() {
    let mut session = session(cave(20, 1, &[]), settings(3, 0), 0);

    assert_eq!(session.begin_shot(), Err(ActionError::NoArrows));
    assert_eq!(
        session.submit_shot_path([room(2), room(3), room(4)]),
        Err(ActionError::NoArrows)
    );
    assert_eq!(session.moves(), 0);
}

#[test]
fn difficulty_changes_only_before_the_first_action() {
    let mut session = session(
        cave(14, 1, &[]),
        Settings {
            difficulty: Difficulty::MIN,
            arrows: ArrowAllowance::ScaledByDifficulty,
            seed: None,
        },
        9,
    );
    assert_eq!(session.arrows(), 5);

    session
        .change_difficulty(Difficulty::MAX)
        .expect("nothing happened yet");

    assert_eq!(session.difficulty(), Difficulty::MAX);
    assert_eq!(session.arrows(), 3);
    let view = session.reveal().into_vec();
    assert!(view.iter().any(|snapshot| snapshot.wumpus && snapshot.id == room(14)));
    assert!(view.iter().any(|snapshot| snapshot.hazard != Hazard::Empty));
    let player = view
        .iter()
        .find(|snapshot| snapshot.player)
        .expect("player is somewhere");
    assert_eq!(player.hazard, Hazard::Empty);

    let exit = session.neighbors()[0];
    let _ = session.submit_move(exit);
    assert_eq!(
        session.change_difficulty(Difficulty::MIN),
        Err(ActionError::DifficultyLocked)
    );
}

#[test]
fn seeded_sessions_build_the_same_cave() {
    let seeded = Settings {
        seed: Some(0xdead_beef),
        ..Settings::default()
    };

    let first = GameSession::new(seeded).reveal().into_vec();
    let second = GameSession::new(seeded).reveal().into_vec();

    assert_eq!(first, second);
}

#[test]
fn fresh_caves_start_the_player_somewhere_safe() {
    for level in 1..=5 {
        for seed in 0..16 {
            let session = GameSession::new(Settings {
                seed: Some(seed),
                ..settings(level, 2)
            });

            let view = session.reveal();
            let player = view
                .iter()
                .find(|snapshot| snapshot.player)
                .expect("player placed");
            assert!(!player.wumpus);
            assert_eq!(player.hazard, Hazard::Empty);
            assert_eq!(session.outcome(), Outcome::InProgress);
        }
    }
}
