//! Menu and turn loop that drive a [`GameSession`] over a console.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use log::warn;
use wumpus_core::{
    ActionError, Difficulty, Hazard, Outcome, RoomId, ARROW_HOPS, WELCOME_BANNER,
};
use wumpus_session::{Aftermath, GameSession, Phase, Settings, ShotReport, TurnReport};
use wumpus_system_scoring::{ScoreLedger, Submission};

use crate::console::Console;

const MENU: &str = "\n1. Instructions\n2. Change difficulty\n3. Play\n4. High scores\n5. Quit";

const INSTRUCTIONS: &str = "\
You are hunting the Wumpus in a cave of twenty rooms. Every room has three
tunnels leading to other rooms.

Each turn you either move through a tunnel or shoot a crooked arrow. An arrow
flies through three rooms; you name each one, and each must connect to the
room the arrow is in. If it passes through your own room it kills you.

Hazards:
  Wumpus - you smell it from the next room. Meeting it is usually fatal.
  Pits   - you feel a draft from the next room. Falling in is always fatal.
  Bats   - you hear them from the next room. They carry you somewhere else.

On higher difficulties the Wumpus wanders after every turn. Run out of arrows
and the hunt is lost. Kill the Wumpus in as few moves as you can.";

/// Whether the player wants to keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Text front end owning the high-score table and the next session.
pub(crate) struct Game<I, O> {
    console: Console<I, O>,
    settings: Settings,
    ledger: ScoreLedger,
    score_file: PathBuf,
    session: GameSession,
    rounds: u64,
}

impl<I: BufRead, O: Write> Game<I, O> {
    pub(crate) fn new(
        settings: Settings,
        ledger: ScoreLedger,
        score_file: PathBuf,
        console: Console<I, O>,
    ) -> Self {
        Self {
            console,
            settings,
            ledger,
            score_file,
            session: GameSession::new(settings),
            rounds: 0,
        }
    }

    /// Runs the main menu until the player quits or input ends.
    pub(crate) fn run(&mut self) -> io::Result<()> {
        self.console.say(WELCOME_BANNER)?;
        loop {
            self.console.say(MENU)?;
            let Some(choice) = self.console.ask("Choice: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => {
                    self.console.say(INSTRUCTIONS)?;
                    self.pause()?;
                }
                "2" => self.choose_difficulty()?,
                "3" => {
                    if self.play()? == Flow::Quit {
                        break;
                    }
                }
                "4" => {
                    self.show_scores()?;
                    self.pause()?;
                }
                "5" => break,
                other => self.console.say(format_args!("{other:?} is not on the menu."))?,
            }
        }
        self.console.say("Farewell, hunter.")
    }

    fn pause(&mut self) -> io::Result<()> {
        let _ = self.console.ask("Press Enter to return to the menu.")?;
        Ok(())
    }

    fn choose_difficulty(&mut self) -> io::Result<()> {
        let prompt = format!("Difficulty 1-5 (currently {}): ", self.settings.difficulty);
        let Some(answer) = self.console.ask(prompt)? else {
            return Ok(());
        };
        let difficulty = match answer.parse::<u8>().map(Difficulty::new) {
            Ok(Ok(difficulty)) => difficulty,
            Ok(Err(error)) => return self.console.say(error),
            Err(_) => return self.console.say("Please enter a number from 1 to 5."),
        };

        if let Err(error) = self.session.change_difficulty(difficulty) {
            return self.console.say(error);
        }
        self.settings.difficulty = difficulty;
        self.console.say(format_args!("Difficulty set to {difficulty}."))
    }

    fn show_scores(&mut self) -> io::Result<()> {
        if self.ledger.is_empty() {
            return self
                .console
                .say("Win at least once to see your results here.");
        }
        self.console.say(format_args!("{:>3}  {:<20} {:>5}", "#", "Name", "Moves"))?;
        for (index, entry) in self.ledger.entries().iter().enumerate() {
            self.console.say(format_args!(
                "{:>3}  {:<20} {:>5}",
                format!("{}.", index + 1),
                entry.name,
                entry.moves
            ))?;
        }
        Ok(())
    }

    fn fresh_session(&mut self) -> GameSession {
        self.rounds += 1;
        GameSession::new(Settings {
            seed: self
                .settings
                .seed
                .map(|seed| seed.wrapping_add(self.rounds)),
            ..self.settings
        })
    }

    fn play(&mut self) -> io::Result<Flow> {
        loop {
            let next = self.fresh_session();
            let mut session = std::mem::replace(&mut self.session, next);
            if self.play_round(&mut session)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
            match self.console.ask("Play again? (y/n) ")? {
                Some(answer) if answer.eq_ignore_ascii_case("y") => {}
                Some(_) => return Ok(Flow::Continue),
                None => return Ok(Flow::Quit),
            }
        }
    }

    pub(crate) fn play_round(&mut self, session: &mut GameSession) -> io::Result<Flow> {
        while !session.outcome().is_terminal() {
            self.describe(session)?;
            let Some(action) = self.console.ask("Move or shoot? (m/s) ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match action.to_ascii_lowercase().as_str() {
                "m" => self.take_move(session)?,
                "s" => self.take_shot(session)?,
                _ => {
                    self.console.say("Answer m to move or s to shoot.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        self.conclude(session)?;
        Ok(Flow::Continue)
    }

    fn describe(&mut self, session: &GameSession) -> io::Result<()> {
        let exits: Vec<String> = session
            .neighbors()
            .iter()
            .map(ToString::to_string)
            .collect();
        self.console.say(format_args!(
            "\nYou are in room {}. Tunnels lead to {}.",
            session.current_room(),
            exits.join(", ")
        ))?;

        let hints = session.hazard_hints();
        if hints.is_quiet() {
            self.console.say("All is quiet.")?;
        }
        if hints.wumpus {
            self.console.say("You smell the Wumpus.")?;
        }
        if hints.bats {
            self.console.say("You hear flapping wings.")?;
        }
        if hints.pit {
            self.console.say("You feel a cold draft.")?;
        }
        self.console.say(format_args!(
            "Arrows: {}  Moves: {}",
            session.arrows(),
            session.moves()
        ))
    }

    /// Asks for a room until a number arrives. `None` means the input closed.
    fn ask_room(&mut self, prompt: &str) -> io::Result<Option<Result<RoomId, ActionError>>> {
        loop {
            let Some(answer) = self.console.ask(prompt)? else {
                return Ok(None);
            };
            match answer.parse::<u8>() {
                Ok(value) => {
                    return Ok(Some(
                        RoomId::checked(value).ok_or(ActionError::UnknownRoom(value)),
                    ))
                }
                Err(_) => self.console.say("Please enter a room number.")?,
            }
        }
    }

    fn take_move(&mut self, session: &mut GameSession) -> io::Result<Flow> {
        loop {
            let Some(room) = self.ask_room("Where to? ")? else {
                return Ok(Flow::Quit);
            };
            match room.and_then(|room| session.submit_move(room)) {
                Ok(report) => {
                    self.narrate_move(&report)?;
                    return Ok(Flow::Continue);
                }
                Err(error) => self.console.say(error)?,
            }
        }
    }

    fn take_shot(&mut self, session: &mut GameSession) -> io::Result<Flow> {
        if let Err(error) = session.begin_shot() {
            self.console.say(error)?;
            return Ok(Flow::Continue);
        }

        while let Phase::Aiming { hop } = session.phase() {
            let prompt = format!("Room for hop {hop} of {ARROW_HOPS}: ");
            let Some(room) = self.ask_room(&prompt)? else {
                return Ok(Flow::Quit);
            };
            match room.and_then(|room| session.aim(room)) {
                Ok(report) => self.narrate_shot(&report, session.arrows())?,
                Err(error) => self.console.say(error)?,
            }
        }
        Ok(Flow::Continue)
    }

    fn narrate_move(&mut self, report: &TurnReport) -> io::Result<()> {
        if report.escaped_wumpus {
            self.console
                .say("The Wumpus is here! It lunges, but you slip away.")?;
        }
        if let Some(room) = report.carried_to {
            self.console.say(format_args!(
                "Giant bats snatch you and drop you in room {room}."
            ))?;
        }
        self.narrate_aftermath(&report.aftermath)
    }

    fn narrate_shot(&mut self, report: &ShotReport, arrows: u8) -> io::Result<()> {
        match report {
            ShotReport::InFlight { room, .. } => self
                .console
                .say(format_args!("The arrow flies into room {room}.")),
            ShotReport::Missed { aftermath } => {
                self.console.say(format_args!(
                    "Your arrow clatters to the floor. Arrows left: {arrows}."
                ))?;
                self.narrate_aftermath(aftermath)
            }
            ShotReport::Hit => self.console.say("Your arrow strikes the Wumpus!"),
            ShotReport::SelfShot => self.console.say("Your arrow whistles back into your room!"),
        }
    }

    fn narrate_aftermath(&mut self, aftermath: &Aftermath) -> io::Result<()> {
        if aftermath.wumpus_moved.is_some() {
            self.console
                .say("You hear the Wumpus lumbering through the tunnels.")?;
        }
        if aftermath.escaped_wumpus {
            self.console
                .say("The Wumpus stumbles into your room, but you slip away.")?;
        }
        Ok(())
    }

    fn conclude(&mut self, session: &GameSession) -> io::Result<()> {
        match session.outcome() {
            Outcome::WumpusDead => self.console.say(format_args!(
                "\nYou killed the Wumpus in {} moves!",
                session.moves()
            ))?,
            Outcome::PlayerDead { cause } => {
                self.console.say(format_args!("\nYou lost: {cause}."))?;
            }
            Outcome::InProgress => return Ok(()),
        }

        self.reveal(session)?;
        if session.outcome() == Outcome::WumpusDead {
            self.record_score(session.moves())?;
        }
        Ok(())
    }

    fn reveal(&mut self, session: &GameSession) -> io::Result<()> {
        self.console.say("\nThe cave revealed:")?;
        for snapshot in session.reveal().iter() {
            let tunnels: Vec<String> = snapshot.neighbors.iter().map(ToString::to_string).collect();
            let mut contents = Vec::new();
            if snapshot.wumpus {
                contents.push("Wumpus");
            }
            match snapshot.hazard {
                Hazard::Bats => contents.push("bats"),
                Hazard::Pit => contents.push("pit"),
                Hazard::Empty => {}
            }
            if snapshot.player {
                contents.push("you");
            }
            self.console.say(format_args!(
                "{:>4}  -> {:<10} {}",
                snapshot.id,
                tunnels.join(","),
                contents.join(", ")
            ))?;
        }
        Ok(())
    }

    fn record_score(&mut self, moves: u32) -> io::Result<()> {
        if !self.ledger.qualifies(moves) {
            return self.console.say("Not quite fast enough for the high-score table.");
        }

        self.console.say("New high score!")?;
        let name = self.console.ask("Enter your name: ")?.unwrap_or_default();
        if let Submission::Recorded { rank } = self.ledger.submit(name, moves) {
            self.console.say(format_args!("You placed #{rank}."))?;
        }
        if let Err(error) = self.ledger.save(&self.score_file) {
            warn!("could not save high scores: {error}");
            self.console.say("The high-score table could not be saved.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wumpus_core::Command;
    use wumpus_session::ArrowAllowance;
    use wumpus_world::{self as world, World};

    use super::*;

    type ScriptedGame<'a> = Game<&'a [u8], Vec<u8>>;

    fn game<'a>(input: &'a str, score_file: PathBuf) -> ScriptedGame<'a> {
        let settings = Settings {
            seed: Some(17),
            ..Settings::default()
        };
        Game::new(
            settings,
            ScoreLedger::new(),
            score_file,
            Console::new(input.as_bytes(), Vec::new()),
        )
    }

    fn output(game: &ScriptedGame<'_>) -> String {
        String::from_utf8_lossy(game.console.output()).into_owned()
    }

    fn cave(wumpus: u8, player: u8) -> GameSession {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceWumpus {
                room: RoomId::new(wumpus),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlacePlayer {
                room: RoomId::new(player),
            },
            &mut events,
        );
        let settings = Settings {
            arrows: ArrowAllowance::Fixed(2),
            ..Settings::default()
        };
        GameSession::from_world(world, settings, ChaCha8Rng::seed_from_u64(0))
    }

    #[test]
    fn menu_greets_and_quits() {
        let mut game = game("5\n", PathBuf::from("unused.txt"));

        game.run().expect("scripted run");

        let text = output(&game);
        assert!(text.starts_with(WELCOME_BANNER));
        assert!(text.contains("Farewell, hunter."));
    }

    #[test]
    fn closed_input_leaves_the_menu() {
        let mut game = game("", PathBuf::from("unused.txt"));

        game.run().expect("scripted run");

        assert!(output(&game).contains("Farewell, hunter."));
    }

    #[test]
    fn empty_score_table_invites_a_win() {
        let mut game = game("4\n\n5\n", PathBuf::from("unused.txt"));

        game.run().expect("scripted run");

        assert!(output(&game).contains("Win at least once"));
    }

    #[test]
    fn difficulty_menu_rejects_then_accepts() {
        let mut game = game("2\n9\n2\n4\n5\n", PathBuf::from("unused.txt"));

        game.run().expect("scripted run");

        let text = output(&game);
        assert!(text.contains("outside the accepted range"));
        assert!(text.contains("Difficulty set to 4."));
        assert_eq!(game.settings.difficulty.get(), 4);
        assert_eq!(game.session.difficulty().get(), 4);
    }

    #[test]
    fn bad_destinations_are_prompted_again() {
        let mut game = game("m\n14\nabc\n5\n", PathBuf::from("unused.txt"));
        let mut session = cave(20, 1);

        let flow = game.play_round(&mut session).expect("scripted round");

        let text = output(&game);
        assert_eq!(flow, Flow::Quit);
        assert!(text.contains("no tunnel leads from room 1 to room 14"));
        assert!(text.contains("Please enter a room number."));
        assert!(text.contains("All is quiet."));
        assert_eq!(session.current_room(), RoomId::new(5));
        assert_eq!(session.moves(), 1);
    }

    #[test]
    fn winning_shot_reveals_the_cave_and_records_the_score() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("highscore.txt");
        let mut game = game("s\n2\n7\n3\n4\nAda\n", path.clone());
        let mut session = cave(4, 1);

        let flow = game.play_round(&mut session).expect("scripted round");

        let text = output(&game);
        assert_eq!(flow, Flow::Continue);
        assert!(text.contains("You killed the Wumpus in 1 moves!"));
        assert!(text.contains("The cave revealed:"));
        assert!(text.contains("arrows cannot pass through walls"));
        assert!(text.contains("You placed #1."));
        let saved = ScoreLedger::load(&path).expect("saved table");
        assert_eq!(saved.best().map(|entry| entry.name.as_str()), Some("Ada"));
    }

    #[test]
    fn losing_round_prints_the_cause() {
        let mut game = game("s\n5\n1\n", PathBuf::from("unused.txt"));
        let mut session = cave(20, 1);

        let flow = game.play_round(&mut session).expect("scripted round");

        assert_eq!(flow, Flow::Continue);
        assert!(output(&game).contains("You lost: you shot yourself with your own arrow."));
    }
}
