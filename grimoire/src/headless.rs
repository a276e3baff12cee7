//! Headless mode for grimoire sessions.
//!
//! A simple line-oriented protocol for scripted sessions and automated
//! testing:
//! - Lines starting with `#` are commands (`#draw`, `#remember`, `#confirm`, ...)
//! - Any other line is a question for the sage while studying
//!
//! Output lines carry a bracketed tag so scripts can match on them.

use grimoire_core::catalog::{ArcanaId, GrimoireId};
use grimoire_core::draw::DrawOutcome;
use grimoire_core::flow::{FlowController, FlowError, FlowEvent, FlowState, Tab};
use grimoire_core::oracle::{Oracle, OracleTopic};
use grimoire_core::review::{Decision, ReviewStep};
use grimoire_core::ritual::{RitualEvent, INCANTATION_PHRASES};
use grimoire_core::SessionConfig;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio::time::Instant;

/// How often the clock is fed while waiting on the oracle.
const TICK_MS: u64 = 100;

/// Whether to keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Run a session on stdin/stdout until `#quit` or end of input.
pub async fn run_headless<O: Oracle>(
    config: SessionConfig,
    oracle: O,
    book: Option<GrimoireId>,
) -> io::Result<()> {
    let mut session = Headless::new(config, oracle);
    let mut stdout = io::stdout();

    writeln!(stdout, "=== Grimoire Headless Mode ===")?;
    if let Some(book) = book {
        session.handle(&format!("#pick {}", book.slug()), &mut stdout).await?;
    }
    write_help(&mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let control = session.handle(&line, &mut stdout).await?;
        stdout.flush()?;
        if control == Control::Quit {
            break;
        }
    }

    Ok(())
}

/// A session driven by text commands on a wall clock.
pub struct Headless<O> {
    flow: FlowController,
    oracle: O,
    started: Instant,
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

impl<O: Oracle> Headless<O> {
    pub fn new(config: SessionConfig, oracle: O) -> Self {
        Self {
            flow: FlowController::new(config),
            oracle,
            started: Instant::now(),
        }
    }

    pub fn flow(&self) -> &FlowController {
        &self.flow
    }

    fn now_ms(&self) -> u64 {
        elapsed_ms(self.started)
    }

    /// Handle one input line, then let pending timers run out.
    pub async fn handle(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Control> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Control::Continue);
        }

        let result = match line.strip_prefix('#') {
            Some(command) => {
                let parts: Vec<&str> = command.split_whitespace().collect();
                match parts.first().copied() {
                    Some("quit") | Some("exit") => {
                        writeln!(out, "Farewell, seeker.")?;
                        return Ok(Control::Quit);
                    }
                    Some(name) => self.command(name, &parts[1..], out).await?,
                    None => Ok(()),
                }
            }
            None => self.ask(line, out).await?,
        };

        if let Err(e) = result {
            writeln!(out, "[ERROR] {e}")?;
        }

        self.settle(out).await?;
        Ok(Control::Continue)
    }

    async fn command(
        &mut self,
        name: &str,
        args: &[&str],
        out: &mut dyn Write,
    ) -> io::Result<Result<(), FlowError>> {
        let result = match name {
            "help" => {
                write_help(out)?;
                Ok(())
            }
            "books" => {
                writeln!(out, "[GRIMOIRES]")?;
                for id in GrimoireId::ALL {
                    let data = id.data();
                    writeln!(
                        out,
                        "  {:<12} {} ({}, {} words, difficulty {})",
                        id.slug(),
                        data.title,
                        data.realm,
                        data.word_count,
                        data.difficulty
                    )?;
                }
                Ok(())
            }
            "pick" => match args.first().and_then(|s| GrimoireId::parse(s)) {
                Some(book) => {
                    let result = self.flow.select_book(book);
                    if result.is_ok() {
                        if self.flow.state() == FlowState::OracleStart {
                            writeln!(out, "[GRIMOIRE] {} opens. Type #start to approach the altar.", book)?;
                        } else {
                            writeln!(out, "[GRIMOIRE] {} is marked. Type #tab oracle to open it.", book)?;
                        }
                    }
                    result
                }
                None => {
                    writeln!(out, "[ERROR] Usage: #pick <grimoire> (see #books)")?;
                    Ok(())
                }
            },
            "start" => {
                let result = self.flow.start();
                if result.is_ok() {
                    writeln!(out, "[ALTAR] The cards fan out before you. Draw three.")?;
                    self.write_cursor(out)?;
                }
                result
            }
            "left" | "right" => {
                let steps = match args.first() {
                    None => Some(1),
                    Some(arg) => arg.parse::<usize>().ok(),
                };
                match steps {
                    Some(steps) => {
                        let steps = isize::try_from(steps).unwrap_or(isize::MAX);
                        let delta = if name == "left" { -steps } else { steps };
                        match self.flow.move_cursor(delta) {
                            Ok(_) => {
                                self.write_cursor(out)?;
                                Ok(())
                            }
                            Err(e) => Err(e),
                        }
                    }
                    None => {
                        writeln!(out, "[ERROR] Usage: #{name} [steps] (a whole number)")?;
                        Ok(())
                    }
                }
            }
            "focus" => match args.first().and_then(|s| s.parse::<usize>().ok()) {
                Some(slot) => {
                    let result = self.flow.focus(slot);
                    if result.is_ok() {
                        self.write_cursor(out)?;
                    }
                    result
                }
                None => {
                    writeln!(out, "[ERROR] Usage: #focus <slot>")?;
                    Ok(())
                }
            },
            "draw" => match self.flow.draw() {
                Ok(DrawOutcome::Drawn { slot, arcana }) => {
                    let drawn = self.flow.table().map(|t| t.selected().len()).unwrap_or(0);
                    writeln!(out, "[DRAWN] {} from slot {slot} ({drawn}/3)", arcana.data().name)?;
                    self.write_cursor(out)?;
                    Ok(())
                }
                Ok(DrawOutcome::Complete(reading)) => {
                    writeln!(out, "[READING] {}", describe_reading(&reading))?;
                    self.write_prophecy(out)?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "accept" => {
                let result = self.flow.accept_prophecy();
                if result.is_ok() {
                    writeln!(out, "[STUDY] Three cards hide among the words. Find them.")?;
                    self.write_word(out)?;
                }
                result
            }
            "remember" => self.review(Decision::Remember, out)?,
            "forget" => self.review(Decision::Forget, out)?,
            "word" => {
                self.write_word(out)?;
                Ok(())
            }
            "enrich" => match self.flow.enrich_current(&self.oracle).await {
                Ok(Some(enrichment)) => {
                    writeln!(out, "[ETYMOLOGY]")?;
                    for morpheme in &enrichment.components {
                        writeln!(out, "  {} = {}", morpheme.part, morpheme.gloss)?;
                    }
                    writeln!(out, "  Image: {}", enrichment.origin_image)?;
                    writeln!(out, "  Logic: {}", enrichment.logic_chain)?;
                    writeln!(out, "  Meaning: {}", enrichment.modern_meaning)?;
                    writeln!(out, "  Nuance: {}", enrichment.nuance)?;
                    if let Some(quote) = &enrichment.quote {
                        writeln!(out, "  \"{quote}\"")?;
                    }
                    Ok(())
                }
                Ok(None) => {
                    writeln!(out, "[ETYMOLOGY] The roots are hidden for now.")?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "ask" => {
                let message = args.join(" ");
                if message.is_empty() {
                    writeln!(out, "[ERROR] Usage: #ask <question>")?;
                    Ok(())
                } else {
                    self.ask(&message, out).await?
                }
            }
            "enter" => {
                let result = self.flow.enter_oracle();
                if result.is_ok() {
                    writeln!(out, "[ORACLE] What do you ask about? love, wealth, decision, energy")?;
                }
                result
            }
            "topic" => match args.first().and_then(|s| OracleTopic::parse(s)) {
                Some(topic) => {
                    let result = self.flow.choose_topic(topic);
                    if result.is_ok() {
                        writeln!(out, "[TOPIC] {topic}: {}. Type #confirm.", topic.focus())?;
                    }
                    result
                }
                None => {
                    writeln!(out, "[ERROR] Usage: #topic <love|wealth|decision|energy>")?;
                    Ok(())
                }
            },
            "confirm" => self.confirm(out).await?,
            "crystallize" => match self.flow.crystallize() {
                Ok(card) => {
                    let card = card.clone();
                    writeln!(out, "[SHARE]")?;
                    for line in card.to_text().lines() {
                        writeln!(out, "  {line}")?;
                    }
                    if let Some(path) = args.first() {
                        match card.save(path).await {
                            Ok(()) => writeln!(out, "[SAVED] Share card written to {path}")?,
                            Err(e) => writeln!(out, "[ERROR] Save failed: {e}")?,
                        }
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "reset" => {
                let result = self.flow.reset();
                if result.is_ok() {
                    writeln!(out, "[RESET] The cards return to the deck. Type #start.")?;
                }
                result
            }
            "tab" => match args.first().and_then(|s| Tab::parse(s)) {
                Some(tab) => {
                    self.flow.set_tab(tab);
                    writeln!(out, "[VIEW] {:?}", self.flow.view())?;
                    Ok(())
                }
                None => {
                    writeln!(out, "[ERROR] Usage: #tab <oracle|grimoire|profile>")?;
                    Ok(())
                }
            },
            "history" => {
                self.write_history(out)?;
                Ok(())
            }
            "status" => {
                self.write_status(out)?;
                Ok(())
            }
            _ => {
                writeln!(out, "[ERROR] Unknown command. Type #help for help.")?;
                Ok(())
            }
        };
        Ok(result)
    }

    fn review(
        &mut self,
        decision: Decision,
        out: &mut dyn Write,
    ) -> io::Result<Result<(), FlowError>> {
        let outcome = match self.flow.review(decision, self.now_ms()) {
            Ok(outcome) => outcome,
            Err(e) => return Ok(Err(e)),
        };

        if let Some(position) = outcome.unlocked {
            let arcana = self.flow.reading().map(|r| r[position]);
            if let Some(arcana) = arcana {
                writeln!(out, "[UNLOCKED] {} surfaces from behind the word.", arcana.data().name)?;
            }
        }
        match outcome.step {
            ReviewStep::Advanced => {}
            ReviewStep::Wrapped => writeln!(out, "[WRAP] Cards still hide. Back to the first word.")?,
            ReviewStep::Completed => {
                writeln!(out, "[COMPLETE] Every card has been found.")?;
                return Ok(Ok(()));
            }
        }
        writeln!(out, "[PROGRESS] {}%", outcome.progress)?;
        self.write_word(out)?;
        Ok(Ok(()))
    }

    async fn ask(
        &mut self,
        message: &str,
        out: &mut dyn Write,
    ) -> io::Result<Result<(), FlowError>> {
        match self.flow.ask(&self.oracle, message).await {
            Ok(reply) => {
                writeln!(out, "[SAGE]")?;
                writeln!(out, "{reply}")?;
                Ok(Ok(()))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    /// Send the reading request while keeping the clock running.
    async fn confirm(&mut self, out: &mut dyn Write) -> io::Result<Result<(), FlowError>> {
        let request = match self.flow.confirm_topic(self.now_ms()) {
            Ok(request) => request,
            Err(e) => return Ok(Err(e)),
        };
        writeln!(out, "[INCANTATION] {}", self.flow.ritual().phrase())?;
        out.flush()?;

        let call = self.oracle.read_tarot(&request.cards, request.topic);
        tokio::pin!(call);
        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));

        let answer = loop {
            tokio::select! {
                answer = &mut call => break answer,
                _ = ticker.tick() => {
                    for event in self.flow.tick(elapsed_ms(self.started)) {
                        write_event(&self.flow, event, out)?;
                    }
                    out.flush()?;
                }
            }
        };

        let reading = match answer {
            Ok(reading) => Some(reading),
            Err(e) => {
                writeln!(out, "[SILENCE] The oracle did not answer: {e}")?;
                writeln!(out, "[ORACLE] Choose a topic again when you are ready.")?;
                None
            }
        };

        Ok(self.flow.resolve_reading(reading, self.now_ms()))
    }

    /// Sleep through pending one-shot timers, reporting what they do.
    async fn settle(&mut self, out: &mut dyn Write) -> io::Result<()> {
        while let Some(deadline) = self.flow.next_deadline() {
            if self.flow.ritual().is_awaiting() {
                break;
            }
            tokio::time::sleep_until(self.started + Duration::from_millis(deadline)).await;
            for event in self.flow.tick(self.now_ms()) {
                write_event(&self.flow, event, out)?;
            }
        }
        Ok(())
    }

    fn write_cursor(&self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(table) = self.flow.table() {
            let remaining = (0..table.len()).filter(|&s| !table.is_hidden(s)).count();
            writeln!(
                out,
                "[CURSOR] slot {} of {} ({remaining} face down)",
                table.active(),
                table.len()
            )?;
        }
        Ok(())
    }

    fn write_prophecy(&self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(prophecy) = self.flow.prophecy() {
            writeln!(out, "[PROPHECY] {}", prophecy.arcana.data().name)?;
            writeln!(out, "{}", prophecy.text)?;
            writeln!(out, "Lucky word: {}", prophecy.lucky_word)?;
            writeln!(out, "Mantra: {}", prophecy.mantra)?;
            writeln!(out, "Type #accept to begin studying.")?;
        }
        Ok(())
    }

    fn write_word(&self, out: &mut dyn Write) -> io::Result<()> {
        let Some(review) = self.flow.review_loop() else {
            return Ok(());
        };
        let word = &review.current().word;
        writeln!(
            out,
            "[WORD {}/{}] {} {} {}",
            review.current_index() + 1,
            review.deck().len(),
            word.word,
            word.phonetic,
            word.part_of_speech
        )?;
        writeln!(out, "  {}", word.meaning)?;
        let parts: Vec<String> = word
            .components
            .iter()
            .map(|m| format!("{} ({})", m.part, m.gloss))
            .collect();
        if !parts.is_empty() {
            writeln!(out, "  {}", parts.join(" + "))?;
        }
        writeln!(out, "  {}", word.logic_chain)?;
        Ok(())
    }

    fn write_history(&self, out: &mut dyn Write) -> io::Result<()> {
        let profile = self.flow.profile();
        writeln!(out, "[PROFILE]")?;
        writeln!(out, "  Readings: {}", profile.readings)?;
        writeln!(out, "  Words sealed: {}", profile.words_sealed)?;
        writeln!(
            out,
            "  Remembered: {}, forgotten: {}, passes: {}",
            profile.tally.remembered, profile.tally.forgotten, profile.tally.passes
        )?;
        for record in self.flow.history().records() {
            writeln!(
                out,
                "  {} {} - {}",
                record.date,
                record.arcana.data().name,
                record.excerpt
            )?;
        }
        Ok(())
    }

    fn write_status(&self, out: &mut dyn Write) -> io::Result<()> {
        let flow = &self.flow;
        writeln!(out, "[STATUS]")?;
        writeln!(out, "  Screen: {}", flow.state())?;
        writeln!(out, "  View: {:?}", flow.view())?;
        writeln!(out, "  Navigation: {}", if flow.nav_visible() { "shown" } else { "hidden" })?;
        if let Some(book) = flow.book() {
            writeln!(out, "  Grimoire: {book}")?;
        }
        if let Some(reading) = flow.reading() {
            writeln!(out, "  Reading: {}", describe_reading(reading))?;
        }
        match flow.state() {
            FlowState::Altar => self.write_cursor(out)?,
            FlowState::Learning | FlowState::OracleReady => {
                if let Some(review) = flow.review_loop() {
                    writeln!(
                        out,
                        "  Found: {}/3, progress {}%",
                        review.unlocked().len(),
                        review.progress()
                    )?;
                }
            }
            FlowState::OracleReading => {
                let ritual = flow.ritual();
                writeln!(out, "  Ritual: {:?}", ritual.stage())?;
                if let Some(topic) = ritual.topic() {
                    writeln!(out, "  Topic: {topic}")?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn describe_reading(reading: &[ArcanaId; 3]) -> String {
    reading
        .iter()
        .map(|a| a.data().name)
        .collect::<Vec<_>>()
        .join(" / ")
}

fn write_event(flow: &FlowController, event: FlowEvent, out: &mut dyn Write) -> io::Result<()> {
    match event {
        FlowEvent::ReviewComplete => {
            writeln!(out, "[ORACLE READY] The oracle awaits. Type #enter.")
        }
        FlowEvent::Ritual(RitualEvent::PhraseChanged(i)) => {
            writeln!(out, "[INCANTATION] {}", INCANTATION_PHRASES[i % INCANTATION_PHRASES.len()])
        }
        FlowEvent::Ritual(RitualEvent::Revealed) => {
            let ritual = flow.ritual();
            let (Some(reading), Some(cards)) = (ritual.result(), ritual.cards()) else {
                return Ok(());
            };
            writeln!(out, "[REVELATION] {}", reading.synthesis_title)?;
            for ((label, arcana), passage) in ["Past", "Present", "Future"]
                .iter()
                .zip(cards)
                .zip(&reading.cards)
            {
                writeln!(out, "  {label}, {}: {}", arcana.data().name, passage.title)?;
                writeln!(out, "    {}", passage.content)?;
            }
            writeln!(out, "  {}", reading.synthesis_content)?;
            writeln!(out, "  ~ {} ~", reading.vibe)?;
            writeln!(out, "Type #crystallize [path] to keep this reading.")
        }
    }
}

fn write_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  #books               - List the grimoires")?;
    writeln!(out, "  #pick <grimoire>     - Open a grimoire")?;
    writeln!(out, "  #start               - Approach the altar")?;
    writeln!(out, "  #left [n] / #right [n] - Move along the fan")?;
    writeln!(out, "  #focus <slot>        - Put the cursor on a slot")?;
    writeln!(out, "  #draw                - Draw the card under the cursor")?;
    writeln!(out, "  #accept              - Accept the prophecy and study")?;
    writeln!(out, "  #remember / #forget  - Judge the current word")?;
    writeln!(out, "  #word                - Show the current word")?;
    writeln!(out, "  #enrich              - Ask for the word's etymology")?;
    writeln!(out, "  #ask <question>      - Ask the sage (or type without #)")?;
    writeln!(out, "  #enter               - Enter the oracle")?;
    writeln!(out, "  #topic <topic>       - love, wealth, decision or energy")?;
    writeln!(out, "  #confirm             - Begin the incantation")?;
    writeln!(out, "  #crystallize [path]  - Make a share card, optionally saved as JSON")?;
    writeln!(out, "  #reset               - Put the cards back")?;
    writeln!(out, "  #tab <tab>           - oracle, grimoire or profile")?;
    writeln!(out, "  #history             - Show past prophecies")?;
    writeln!(out, "  #status              - Show the session state")?;
    writeln!(out, "  #quit                - Leave")
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_core::ritual::RitualStage;
    use grimoire_core::MockOracle;

    fn session(oracle: MockOracle) -> Headless<MockOracle> {
        let config = SessionConfig::new()
            .with_seed(3)
            .with_review_complete_delay(0)
            .with_revelation_delay(0);
        Headless::new(config, oracle)
    }

    async fn run(session: &mut Headless<MockOracle>, line: &str) -> String {
        let mut out = Vec::new();
        session.handle(line, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    async fn study(session: &mut Headless<MockOracle>) {
        for _ in 0..500 {
            if run(session, "#remember").await.contains("[ORACLE READY]") {
                return;
            }
        }
        panic!("study never finished");
    }

    #[tokio::test]
    async fn test_full_session() {
        let mut session = session(MockOracle::new());

        assert!(run(&mut session, "#pick ember").await.contains("[GRIMOIRE]"));
        assert!(run(&mut session, "#start").await.contains("[ALTAR]"));
        assert!(run(&mut session, "#draw").await.contains("(1/3)"));
        run(&mut session, "#draw").await;
        let output = run(&mut session, "#draw").await;
        assert!(output.contains("[READING]"));
        assert!(output.contains("[PROPHECY]"));

        assert!(run(&mut session, "#accept").await.contains("[WORD 1/"));
        study(&mut session).await;
        assert_eq!(session.flow().state(), FlowState::OracleReady);

        run(&mut session, "#enter").await;
        run(&mut session, "#topic wealth").await;
        let output = run(&mut session, "#confirm").await;
        assert!(output.contains("[REVELATION] A Reading on Wealth"));

        let output = run(&mut session, "#crystallize").await;
        assert!(output.contains("[SHARE]"));
        assert!(session.flow().share_card().is_some());
    }

    #[tokio::test]
    async fn test_failed_oracle_returns_to_topics() {
        let mut session = session(MockOracle::new());
        run(&mut session, "#pick hearthstone").await;
        run(&mut session, "#start").await;
        for _ in 0..3 {
            run(&mut session, "#draw").await;
        }
        run(&mut session, "#accept").await;
        study(&mut session).await;
        run(&mut session, "#enter").await;
        run(&mut session, "#topic love").await;

        session.oracle.set_failing(true);
        let output = run(&mut session, "#confirm").await;
        assert!(output.contains("[SILENCE]"));
        assert_eq!(session.flow().ritual().stage(), RitualStage::Selection);
        assert_eq!(session.flow().ritual().topic(), Some(OracleTopic::Love));
    }

    #[tokio::test]
    async fn test_wrong_screen_reports_error() {
        let mut session = session(MockOracle::new());
        let output = run(&mut session, "#draw").await;
        assert!(output.starts_with("[ERROR] Cannot draw a card from the library"));
        assert!(run(&mut session, "#nonsense").await.contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_cursor_steps_are_whole_numbers() {
        let mut session = session(MockOracle::new());
        run(&mut session, "#pick ember").await;
        run(&mut session, "#start").await;

        let output = run(&mut session, "#left -9223372036854775808").await;
        assert!(output.starts_with("[ERROR] Usage: #left"));
        assert_eq!(session.flow().table().map(|t| t.active()), Some(0));

        let output = run(&mut session, "#right 18446744073709551615").await;
        assert!(output.contains("[CURSOR] slot 31 of 32"));
        let output = run(&mut session, "#left 18446744073709551615").await;
        assert!(output.contains("[CURSOR] slot 0 of 32"));
    }

    #[tokio::test]
    async fn test_pick_from_grimoire_tab_waits_for_oracle_tab() {
        let mut session = session(MockOracle::new());
        run(&mut session, "#tab grimoire").await;

        let output = run(&mut session, "#pick ember").await;
        assert!(output.contains("is marked"));
        assert_eq!(session.flow().state(), FlowState::Library);

        let output = run(&mut session, "#tab oracle").await;
        assert!(output.contains("OracleStart"));
        assert_eq!(session.flow().state(), FlowState::OracleStart);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut session = session(MockOracle::new());
        let mut out = Vec::new();
        let control = session.handle("#quit", &mut out).await.unwrap();
        assert_eq!(control, Control::Quit);
    }
}
