use crate::consist::{CursorMove, ManifestEntry, ProductLoad, ProductSummary, Train, TrainCar};
use itertools::Itertools;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// One menu selection, parsed from a single input line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    CursorForward,
    CursorBackward,
    InsertCar,
    RemoveCar,
    SetLoad,
    FindProduct,
    DisplayTrain,
    DisplayManifest,
    RemoveDangerous,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "f" => Some(Command::CursorForward),
        "b" => Some(Command::CursorBackward),
        "i" => Some(Command::InsertCar),
        "r" => Some(Command::RemoveCar),
        "l" => Some(Command::SetLoad),
        "s" => Some(Command::FindProduct),
        "t" => Some(Command::DisplayTrain),
        "m" => Some(Command::DisplayManifest),
        "d" => Some(Command::RemoveDangerous),
        "q" => Some(Command::Quit),
        _ => None,
    }
}

const MENU: &str = "\
(F) Cursor Forward
(B) Cursor Backward
(I) Insert Car After Cursor
(R) Remove Car At Cursor
(L) Set Product Load
(S) Search For Product
(T) Display Train
(M) Display Manifest
(D) Remove Dangerous Cars
(Q) Quit";

const MANIFEST_HEADER: &str =
    "Num   Length (m)    Weight (t)  |    Name      Weight (t)     Value ($)   Dangerous";
const MANIFEST_RULE: &str =
    "-----------------------------------------------------------------------------------";
const PRODUCT_HEADER: &str = "Name      Weight (t)     Value ($)   Dangerous";
const PRODUCT_RULE: &str = "----------------------------------------------";

/// Menu loop around one train. All domain state lives in the train; the shell
/// only parses input, dispatches commands, and renders the returned records.
pub struct Shell<R, W> {
    input: R,
    output: W,
    train: Train,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(train: Train, input: R, output: W) -> Self {
        Shell { input, output, train }
    }

    /// Runs until the user quits or stdin is exhausted.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(line) = self.prompt_line("Enter a selection: ")? else {
                break;
            };
            let Some(command) = parse_command(&line) else {
                writeln!(self.output, "That option does not exist!")?;
                continue;
            };
            debug!(?command, "dispatching menu selection");
            match command {
                Command::Quit => {
                    writeln!(self.output, "The program has been terminated.")?;
                    break;
                }
                Command::CursorForward => self.cursor_forward()?,
                Command::CursorBackward => self.cursor_backward()?,
                Command::InsertCar => self.insert_car()?,
                Command::RemoveCar => self.remove_car()?,
                Command::SetLoad => self.set_load()?,
                Command::FindProduct => self.find_product()?,
                Command::DisplayTrain => writeln!(self.output, "{}", self.train)?,
                Command::DisplayManifest => self.display_manifest()?,
                Command::RemoveDangerous => self.remove_dangerous()?,
            }
        }
        Ok(())
    }

    fn cursor_forward(&mut self) -> io::Result<()> {
        let message = match self.train.cursor_forward() {
            CursorMove::Moved => "Cursor moved forward.",
            CursorMove::AtEnd => "The cursor is already at the end of the train.",
            CursorMove::Empty => "No cars are in the train!",
        };
        writeln!(self.output, "{message}")
    }

    fn cursor_backward(&mut self) -> io::Result<()> {
        let message = match self.train.cursor_backward() {
            CursorMove::Moved => "Cursor moved backward.",
            CursorMove::AtEnd => "The cursor is already at the front of the train.",
            CursorMove::Empty => "No cars are in the train!",
        };
        writeln!(self.output, "{message}")
    }

    fn insert_car(&mut self) -> io::Result<()> {
        let Some(length) = self.prompt_f64("Enter car length in meters: ")? else {
            return Ok(());
        };
        let Some(weight) = self.prompt_f64("Enter car weight in tons: ")? else {
            return Ok(());
        };
        match self.train.insert_after_cursor(TrainCar::new(length, weight)) {
            Ok(()) => writeln!(
                self.output,
                "A {length:.1} meter, {weight:.1} ton car has been inserted into the train."
            ),
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    fn remove_car(&mut self) -> io::Result<()> {
        match self.train.remove_cursor() {
            Ok(car) => {
                writeln!(self.output, "The following car was unlinked from the train:")?;
                writeln!(self.output, "  {}", describe_car(&car))
            }
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    fn set_load(&mut self) -> io::Result<()> {
        if let Err(err) = self.train.cursor_car() {
            return writeln!(self.output, "{err}");
        }
        let Some(name) = self.prompt_line("Enter the product name: ")? else {
            return Ok(());
        };
        let Some(weight) = self.prompt_f64("Enter the product weight in tons: ")? else {
            return Ok(());
        };
        let Some(value) = self.prompt_f64("Enter the product value in dollars: ")? else {
            return Ok(());
        };
        let Some(dangerous) = self.prompt_yes_no("Is the product dangerous (y/n)? ")? else {
            return Ok(());
        };

        let load = match ProductLoad::new(name, weight, value, dangerous) {
            Ok(load) => load,
            Err(err) => return writeln!(self.output, "{err}"),
        };
        match self.train.set_cursor_load(Some(load)) {
            Ok(displaced) => {
                writeln!(
                    self.output,
                    "A load of {weight:.1} tons has been added to the current car."
                )?;
                if let Some(old) = displaced {
                    writeln!(
                        self.output,
                        "The previous load of {} was taken off the car.",
                        old.name()
                    )?;
                }
                Ok(())
            }
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    fn find_product(&mut self) -> io::Result<()> {
        let Some(name) = self.prompt_line("Enter the name of the product to find: ")? else {
            return Ok(());
        };
        match self.train.find_product(&name) {
            Ok(summary) => self.write_product_summary(&summary),
            Err(err) => writeln!(self.output, "{err}"),
        }
    }

    fn display_manifest(&mut self) -> io::Result<()> {
        writeln!(self.output, "{MANIFEST_HEADER}")?;
        writeln!(self.output, "{MANIFEST_RULE}")?;
        let rows = self.train.manifest().iter().map(format_manifest_row).join("\n");
        if rows.is_empty() {
            Ok(())
        } else {
            writeln!(self.output, "{rows}")
        }
    }

    fn remove_dangerous(&mut self) -> io::Result<()> {
        let removed = self.train.remove_dangerous_cars();
        if removed.is_empty() {
            return writeln!(self.output, "The train has no dangerous cars in it!");
        }
        writeln!(
            self.output,
            "{} dangerous car(s) have been removed from the train:",
            removed.len()
        )?;
        for car in &removed {
            writeln!(self.output, "  {}", describe_car(car))?;
        }
        Ok(())
    }

    fn write_product_summary(&mut self, summary: &ProductSummary) -> io::Result<()> {
        writeln!(
            self.output,
            "The following was found on {} car(s):",
            summary.cars
        )?;
        writeln!(self.output, "{PRODUCT_HEADER}")?;
        writeln!(self.output, "{PRODUCT_RULE}")?;
        writeln!(
            self.output,
            "{:<10}{:<15.1}{:<12.2}{}",
            summary.name,
            summary.weight,
            summary.value,
            yes_no(summary.dangerous)
        )
    }

    /// Prints `prompt` and reads one trimmed line; `None` means end of input.
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompts until the line parses as a number.
    fn prompt_f64(&mut self, prompt: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    fn prompt_yes_no(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "y" => return Ok(Some(true)),
                "n" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}

fn format_manifest_row(entry: &ManifestEntry) -> String {
    let (name, load_weight, load_value, dangerous) = match &entry.load {
        Some(load) => (load.name(), load.weight(), load.value(), load.is_dangerous()),
        None => ("EMPTY", 0.0, 0.0, false),
    };
    let cursor = if entry.at_cursor { "<- [Cursor]" } else { "" };
    format!(
        "{:<6}{:<14.1}{:<17.1}{:<10}{:<15.1}{:<12.2}{:<16}{}",
        entry.position,
        entry.length,
        entry.weight,
        name,
        load_weight,
        load_value,
        yes_no(dangerous),
        cursor
    )
}

fn describe_car(car: &TrainCar) -> String {
    match car.load() {
        Some(load) => format!(
            "{:.1} m, {:.1} t car carrying {} ({:.1} t, ${:.2}, {})",
            car.length(),
            car.weight(),
            load.name(),
            load.weight(),
            load.value(),
            if load.is_dangerous() { "dangerous" } else { "not dangerous" },
        ),
        None => format!("{:.1} m, {:.1} t car, empty", car.length(), car.weight()),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}
