//! Study and quiz session state machine.
//!
//! A session owns the source collection, the current round and every piece
//! of per-card interaction state. The UI drives it exclusively through the
//! operations below; each one returns an optional [`Feedback`] describing
//! what happened, including rejected calls, which never change state.

use super::round::{Round, select_round};
use super::{Action, Advisory, Card, Feedback, QuizSummary};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Home,
    Study,
    Quiz,
    /// Terminal state of a quiz round.
    Results,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Home => "Home",
            Mode::Study => "Study Mode",
            Mode::Quiz => "Quiz Mode",
            Mode::Results => "Quiz Results",
        };
        f.write_str(label)
    }
}

type Guard = std::result::Result<(), Advisory>;

#[derive(Debug)]
pub struct Session<R = StdRng> {
    all_cards: Vec<Card>,
    cards_per_round: usize,
    round: Round,
    mode: Mode,
    current_index: usize,
    revealed: bool,
    selected_option: Option<String>,
    /// First answer given per round index; a card is scored once per round.
    answers: BTreeMap<usize, String>,
    learned: BTreeSet<usize>,
    missed: Vec<usize>,
    score: u32,
    attempts: u32,
    reshuffling: bool,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(cards_per_round: usize) -> Self {
        Self::with_rng(cards_per_round, StdRng::from_os_rng())
    }
}

impl<R: Rng> Session<R> {
    /// Creates an empty session in [`Mode::Home`] drawing randomness from `rng`.
    pub fn with_rng(cards_per_round: usize, rng: R) -> Self {
        Self {
            all_cards: Vec::new(),
            cards_per_round: cards_per_round.max(1),
            round: Round::default(),
            mode: Mode::Home,
            current_index: 0,
            revealed: false,
            selected_option: None,
            answers: BTreeMap::new(),
            learned: BTreeSet::new(),
            missed: Vec::new(),
            score: 0,
            attempts: 0,
            reshuffling: false,
            rng,
        }
    }

    /// Installs the loaded card collection and selects an initial round.
    pub fn attach_cards(&mut self, cards: Vec<Card>) -> Result<()> {
        if cards.is_empty() {
            return Err(Error::EmptySource);
        }
        tracing::info!(cards = cards.len(), "card collection attached");
        self.all_cards = cards;
        self.install_new_round()
    }

    fn install_new_round(&mut self) -> Result<()> {
        self.round = select_round(&self.all_cards, self.cards_per_round, &mut self.rng)?;
        self.current_index = 0;
        self.revealed = false;
        self.selected_option = None;
        self.answers.clear();
        self.learned.clear();
        self.missed.clear();
        self.score = 0;
        self.attempts = 0;
        Ok(())
    }

    /// Starts a study or quiz round from the home screen.
    pub fn enter_mode(&mut self, target: Mode) -> Option<Feedback> {
        if !matches!(target, Mode::Study | Mode::Quiz) {
            return Some(Feedback::Advisory(Advisory::Unavailable(target)));
        }
        if self.mode != Mode::Home {
            return Some(Feedback::Advisory(Advisory::Unavailable(self.mode)));
        }
        if self.install_new_round().is_err() {
            return Some(Feedback::Advisory(Advisory::NoCards));
        }
        tracing::info!(mode = %target, cards = self.round.len(), "entering mode");
        self.mode = target;
        None
    }

    /// Leaves any mode for the home screen. Round counters are kept.
    pub fn go_home(&mut self) {
        if self.mode != Mode::Home {
            tracing::info!(from = %self.mode, "returning home");
        }
        self.mode = Mode::Home;
        self.revealed = false;
        self.selected_option = None;
    }

    /// Flips the current card. In quiz mode the answer stays hidden until an
    /// option has been chosen, unless the card has no options.
    pub fn reveal(&mut self) -> Option<Feedback> {
        if let Err(advisory) = self.card_guard(&[Mode::Study, Mode::Quiz]) {
            return Some(Feedback::Advisory(advisory));
        }
        if self.revealed {
            self.revealed = false;
            return None;
        }
        let gated = self.mode == Mode::Quiz
            && self.selected_option.is_none()
            && self.current_card().is_some_and(Card::has_options);
        if gated {
            return Some(Feedback::Advisory(Advisory::SelectAnswerFirst));
        }
        self.revealed = true;
        None
    }

    /// Records the first answer chosen for the current quiz card.
    pub fn select_answer(&mut self, option: &str) -> Option<Feedback> {
        if let Err(advisory) = self.card_guard(&[Mode::Quiz]) {
            return Some(Feedback::Advisory(advisory));
        }
        if self.answers.contains_key(&self.current_index) {
            return Some(Feedback::Advisory(Advisory::AlreadyAnswered));
        }
        let card = &self.round[self.current_index];
        if !card.accepts(option) {
            return Some(Feedback::Advisory(Advisory::UnknownOption));
        }
        let correct = card.is_correct(option);

        self.selected_option = Some(option.to_owned());
        self.answers.insert(self.current_index, option.to_owned());
        self.attempts += 1;
        tracing::debug!(index = self.current_index, correct, "answer selected");

        if correct {
            self.score += 1;
            Some(Feedback::Correct)
        } else {
            self.missed.push(self.current_index);
            Some(Feedback::Incorrect)
        }
    }

    /// Marks the current study card as learned and moves on.
    pub fn mark_learned(&mut self) -> Option<Feedback> {
        if let Err(advisory) = self.card_guard(&[Mode::Study]) {
            return Some(Feedback::Advisory(advisory));
        }
        let first_time = self.learned.insert(self.current_index);
        self.advance();
        first_time.then_some(Feedback::Learned)
    }

    pub fn next_card(&mut self) -> Option<Feedback> {
        if let Err(advisory) = self.card_guard(&[Mode::Study, Mode::Quiz]) {
            return Some(Feedback::Advisory(advisory));
        }
        self.advance()
    }

    pub fn prev_card(&mut self) -> Option<Feedback> {
        if let Err(advisory) = self.card_guard(&[Mode::Study, Mode::Quiz]) {
            return Some(Feedback::Advisory(advisory));
        }
        self.current_index = match self.current_index {
            0 => self.round.len() - 1,
            i => i - 1,
        };
        self.show_current_card();
        None
    }

    /// Replaces the round with a freshly shuffled set of cards.
    ///
    /// From the results screen this is the "try again" path back into a quiz.
    /// The session stays in the reshuffling state until
    /// [`finish_reshuffle`](Self::finish_reshuffle) is called.
    pub fn new_round(&mut self) -> Option<Feedback> {
        if self.reshuffling {
            return Some(Feedback::Advisory(Advisory::Reshuffling));
        }
        if self.mode == Mode::Home {
            return Some(Feedback::Advisory(Advisory::Unavailable(Mode::Home)));
        }
        self.reshuffling = true;
        if self.install_new_round().is_err() {
            self.reshuffling = false;
            return Some(Feedback::Advisory(Advisory::NoCards));
        }
        if self.mode == Mode::Results {
            self.mode = Mode::Quiz;
        }
        tracing::info!(mode = %self.mode, cards = self.round.len(), "new round shuffled");
        None
    }

    pub fn finish_reshuffle(&mut self) {
        self.reshuffling = false;
    }

    /// Dispatches an input action to the matching operation.
    pub fn apply(&mut self, action: Action) -> Option<Feedback> {
        match action {
            Action::Flip => self.reveal(),
            Action::Next => self.next_card(),
            Action::Previous => self.prev_card(),
            Action::MarkLearned => self.mark_learned(),
            Action::SelectOption(number) => {
                if let Err(advisory) = self.card_guard(&[Mode::Quiz]) {
                    return Some(Feedback::Advisory(advisory));
                }
                let option = number
                    .checked_sub(1)
                    .and_then(|i| self.round[self.current_index].options().get(i))
                    .cloned();
                match option {
                    Some(option) => self.select_answer(&option),
                    None => Some(Feedback::Advisory(Advisory::UnknownOption)),
                }
            }
        }
    }

    fn advance(&mut self) -> Option<Feedback> {
        if Some(self.current_index) != self.round.last_index() {
            self.current_index += 1;
            self.show_current_card();
            return None;
        }
        self.revealed = false;
        match self.mode {
            Mode::Quiz => {
                self.mode = Mode::Results;
                let accuracy = self.accuracy();
                tracing::info!(
                    score = self.score,
                    attempts = self.attempts,
                    accuracy,
                    "quiz round complete"
                );
                Some(Feedback::RoundComplete { accuracy })
            }
            _ => {
                self.current_index = 0;
                self.show_current_card();
                None
            }
        }
    }

    /// Hides the answer and brings back the recorded choice, if any.
    fn show_current_card(&mut self) {
        self.revealed = false;
        self.selected_option = self.answers.get(&self.current_index).cloned();
    }

    fn card_guard(&self, allowed: &[Mode]) -> Guard {
        if self.reshuffling {
            return Err(Advisory::Reshuffling);
        }
        if !allowed.contains(&self.mode) {
            return Err(Advisory::Unavailable(self.mode));
        }
        if self.round.is_empty() {
            return Err(Advisory::NoCards);
        }
        Ok(())
    }
}

impl<R> Session<R> {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn has_cards(&self) -> bool {
        !self.all_cards.is_empty()
    }

    pub fn total_cards(&self) -> usize {
        self.all_cards.len()
    }

    pub fn cards_per_round(&self) -> usize {
        self.cards_per_round
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.round.get(self.current_index)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn learned_count(&self) -> usize {
        self.learned.len()
    }

    pub fn is_learned(&self, index: usize) -> bool {
        self.learned.contains(&index)
    }

    pub fn missed_indices(&self) -> &[usize] {
        &self.missed
    }

    pub fn is_reshuffling(&self) -> bool {
        self.reshuffling
    }

    /// Share of the round completed, between 0 and 1.
    pub fn progress_fraction(&self) -> f32 {
        let len = self.round.len();
        if len == 0 {
            return 0.0;
        }
        match self.mode {
            Mode::Home => 0.0,
            Mode::Study => self.learned.len() as f32 / len as f32,
            Mode::Quiz | Mode::Results => (self.current_index + 1) as f32 / len as f32,
        }
    }

    /// Percentage of correct answers, rounded to the nearest integer.
    pub fn accuracy(&self) -> u8 {
        if self.attempts == 0 {
            return 0;
        }
        (f64::from(self.score) * 100.0 / f64::from(self.attempts)).round() as u8
    }

    pub fn summary(&self) -> Option<QuizSummary<'_>> {
        if !matches!(self.mode, Mode::Quiz | Mode::Results) {
            return None;
        }
        Some(QuizSummary {
            score: self.score,
            attempts: self.attempts,
            round_len: self.round.len(),
            accuracy: self.accuracy(),
            missed: self.missed.iter().filter_map(|&i| self.round.get(i)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                Card::new(format!("q{i}"), format!("a{i}"))
                    .with_options([format!("a{i}"), format!("wrong{i}")])
            })
            .collect()
    }

    fn session(n: usize, per_round: usize) -> Session {
        let mut session = Session::with_rng(per_round, StdRng::seed_from_u64(11));
        session.attach_cards(cards(n)).unwrap();
        session
    }

    fn answer(session: &Session) -> String {
        session.current_card().unwrap().answer.clone()
    }

    #[test]
    fn test_new_session_starts_home_without_round() {
        let session = Session::with_rng(5, StdRng::seed_from_u64(1));
        assert_eq!(session.mode(), Mode::Home);
        assert!(session.round().is_empty());
        assert!(!session.has_cards());
        assert_eq!(session.progress_fraction(), 0.0);
    }

    #[test]
    fn test_attach_empty_collection_fails() {
        let mut session = Session::with_rng(5, StdRng::seed_from_u64(1));
        assert!(matches!(session.attach_cards(vec![]), Err(Error::EmptySource)));
    }

    #[test]
    fn test_enter_mode_without_cards_is_rejected() {
        let mut session = Session::with_rng(5, StdRng::seed_from_u64(1));
        assert_eq!(
            session.enter_mode(Mode::Study),
            Some(Feedback::Advisory(Advisory::NoCards))
        );
        assert_eq!(session.mode(), Mode::Home);
    }

    #[test]
    fn test_enter_mode_only_from_home() {
        let mut s = session(6, 3);
        assert_eq!(s.enter_mode(Mode::Study), None);
        assert_eq!(
            s.enter_mode(Mode::Quiz),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Study)))
        );
        assert_eq!(s.mode(), Mode::Study);
    }

    #[test]
    fn test_enter_results_directly_is_rejected() {
        let mut s = session(3, 3);
        assert_eq!(
            s.enter_mode(Mode::Results),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Results)))
        );
        assert_eq!(s.mode(), Mode::Home);
    }

    #[test]
    fn test_round_respects_cards_per_round() {
        let s = session(10, 4);
        assert_eq!(s.round().len(), 4);
        assert_eq!(s.total_cards(), 10);
    }

    #[test]
    fn test_select_answer_outside_quiz_is_rejected() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Study);
        let a = answer(&s);
        assert_eq!(
            s.select_answer(&a),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Study)))
        );
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn test_mark_learned_outside_study_is_rejected() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        assert_eq!(
            s.mark_learned(),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Quiz)))
        );
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.learned_count(), 0);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        assert_eq!(
            s.select_answer("not an option"),
            Some(Feedback::Advisory(Advisory::UnknownOption))
        );
        assert_eq!(s.selected_option(), None);
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn test_reveal_after_selection_then_hide() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        let a = answer(&s);
        s.select_answer(&a);

        assert_eq!(s.reveal(), None);
        assert!(s.is_revealed());
        assert_eq!(s.reveal(), None);
        assert!(!s.is_revealed());
    }

    #[test]
    fn test_free_form_quiz_card_reveals_like_study() {
        let mut s = Session::with_rng(1, StdRng::seed_from_u64(2));
        s.attach_cards(vec![Card::new("Explain ownership", "One owner")]).unwrap();
        s.enter_mode(Mode::Quiz);

        assert_eq!(s.reveal(), None);
        assert!(s.is_revealed());
    }

    #[test]
    fn test_card_change_hides_answer_and_keeps_choice() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        let a = answer(&s);
        s.select_answer(&a);
        s.reveal();

        s.next_card();
        assert!(!s.is_revealed());
        assert_eq!(s.selected_option(), None);

        s.prev_card();
        assert!(!s.is_revealed());
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.selected_option(), Some(a.as_str()));
    }

    #[test]
    fn test_prev_card_wraps_to_last() {
        let mut s = session(4, 4);
        s.enter_mode(Mode::Study);
        assert_eq!(s.prev_card(), None);
        assert_eq!(s.current_index(), 3);
    }

    #[test]
    fn test_navigation_is_ignored_in_results() {
        let mut s = session(1, 1);
        s.enter_mode(Mode::Quiz);
        s.next_card();
        assert_eq!(s.mode(), Mode::Results);

        assert_eq!(
            s.prev_card(),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Results)))
        );
        assert_eq!(
            s.next_card(),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Results)))
        );
        assert_eq!(s.mode(), Mode::Results);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_new_round_is_guarded_while_reshuffling() {
        let mut s = session(8, 4);
        s.enter_mode(Mode::Study);
        s.mark_learned();

        assert_eq!(s.new_round(), None);
        assert!(s.is_reshuffling());
        assert_eq!(s.learned_count(), 0);
        assert_eq!(s.current_index(), 0);

        assert_eq!(
            s.new_round(),
            Some(Feedback::Advisory(Advisory::Reshuffling))
        );
        assert_eq!(
            s.next_card(),
            Some(Feedback::Advisory(Advisory::Reshuffling))
        );

        s.finish_reshuffle();
        assert!(!s.is_reshuffling());
        assert_eq!(s.next_card(), None);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn test_new_round_from_results_retries_quiz() {
        let mut s = session(2, 2);
        s.enter_mode(Mode::Quiz);
        let wrong = s.current_card().unwrap().options()[1].clone();
        s.select_answer(&wrong);
        s.next_card();
        s.next_card();
        assert_eq!(s.mode(), Mode::Results);

        s.new_round();
        s.finish_reshuffle();
        assert_eq!(s.mode(), Mode::Quiz);
        assert_eq!(s.score(), 0);
        assert_eq!(s.attempts(), 0);
        assert!(s.missed_indices().is_empty());
    }

    #[test]
    fn test_new_round_from_home_is_rejected() {
        let mut s = session(3, 3);
        assert_eq!(
            s.new_round(),
            Some(Feedback::Advisory(Advisory::Unavailable(Mode::Home)))
        );
        assert!(!s.is_reshuffling());
    }

    #[test]
    fn test_go_home_keeps_learned_count() {
        let mut s = session(4, 4);
        s.enter_mode(Mode::Study);
        s.mark_learned();
        s.mark_learned();
        s.go_home();

        assert_eq!(s.mode(), Mode::Home);
        assert_eq!(s.learned_count(), 2);

        s.enter_mode(Mode::Study);
        assert_eq!(s.learned_count(), 0);
    }

    #[test]
    fn test_select_option_by_number() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        let expected = s.current_card().unwrap().options()[1].clone();

        assert_eq!(s.apply(Action::SelectOption(2)), Some(Feedback::Incorrect));
        assert_eq!(s.selected_option(), Some(expected.as_str()));
    }

    #[test]
    fn test_select_option_out_of_range() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);

        for number in [0, 3, 4] {
            assert_eq!(
                s.apply(Action::SelectOption(number)),
                Some(Feedback::Advisory(Advisory::UnknownOption))
            );
        }
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn test_apply_dispatches_navigation() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Study);

        assert_eq!(s.apply(Action::Flip), None);
        assert!(s.is_revealed());
        assert_eq!(s.apply(Action::Next), None);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.apply(Action::Previous), None);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.apply(Action::MarkLearned), Some(Feedback::Learned));
        assert!(s.is_learned(0));
    }

    #[test]
    fn test_actions_are_ignored_on_home() {
        let mut s = session(3, 3);
        for action in [Action::Flip, Action::Next, Action::Previous, Action::MarkLearned] {
            assert_eq!(
                s.apply(action),
                Some(Feedback::Advisory(Advisory::Unavailable(Mode::Home)))
            );
        }
    }

    #[test]
    fn test_summary_lists_missed_cards_in_order() {
        let mut s = session(3, 3);
        s.enter_mode(Mode::Quiz);
        let mut expected = Vec::new();
        for _ in 0..3 {
            let card = s.current_card().unwrap().clone();
            s.select_answer(&card.options()[1]);
            expected.push(card);
            s.next_card();
        }

        let summary = s.summary().unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.missed, expected.iter().collect::<Vec<_>>());
        assert_eq!(s.missed_indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_summary_only_for_quiz() {
        let mut s = session(3, 3);
        assert!(s.summary().is_none());
        s.enter_mode(Mode::Study);
        assert!(s.summary().is_none());
    }

    #[test]
    fn test_accuracy_stays_in_range() {
        let mut s = session(5, 5);
        s.enter_mode(Mode::Quiz);
        for i in 0..5 {
            let card = s.current_card().unwrap().clone();
            let pick = if i % 2 == 0 { &card.answer } else { &card.options()[1] };
            s.select_answer(pick);
            assert!(s.score() <= s.attempts());
            assert!(s.accuracy() <= 100);
            s.next_card();
        }
        assert_eq!(s.accuracy(), 60);
    }
}
