//! Prints battle events to stdout.

use battle_core::{BattleEvent, EventSink};
use console::style;

pub struct ConsoleNarrator {
    show_phases: bool,
    lines: usize,
}

impl ConsoleNarrator {
    pub fn new(show_phases: bool) -> Self {
        Self {
            show_phases,
            lines: 0,
        }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }
}

impl EventSink for ConsoleNarrator {
    fn emit(&mut self, event: BattleEvent) {
        let line = event.to_string();
        match &event {
            BattleEvent::PhaseEntered { .. } if !self.show_phases => return,
            BattleEvent::PhaseEntered { .. } => println!("{}", style(line).dim()),
            BattleEvent::SkillUsed { .. } => println!("{}", style(line).bold()),
            BattleEvent::Defeated { .. } => println!("{}", style(line).red().bold()),
            BattleEvent::Healed { .. } => println!("  {}", style(line).green()),
            BattleEvent::StatusApplied { .. } | BattleEvent::StatusCleared { .. } => {
                println!("  {}", style(line).cyan())
            }
            BattleEvent::BattleEnded { .. } => println!("\n{}", style(line).yellow().bold()),
            _ => println!("  {line}"),
        }
        self.lines += 1;
    }
}
