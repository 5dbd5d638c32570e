use crate::{Error, Result};
use avdata::Function;
use stockchart::{parse_date, ChartKind, DateRange};
use std::io::{BufRead, Write};

/// everything collected from the user for one chart
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub symbol: String,
    pub kind: ChartKind,
    pub function: Function,
    pub interval: Option<String>,
    pub range: DateRange,
}

/// line based prompts over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    // a closed input would otherwise spin the retry loops
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error("input closed".to_owned()));
        }
        Ok(line.trim_end_matches(|c: char| c == '\n' || c == '\r').to_owned())
    }

    pub fn symbol(&mut self) -> Result<String> {
        let s = self.ask("Enter stock symbol (e.g., AAPL, MSFT): ")?;
        Ok(s.trim().to_uppercase())
    }

    /// asks until the answer is line or bar
    pub fn chart_kind(&mut self) -> Result<ChartKind> {
        loop {
            let s = self.ask("Enter chart type (line/bar): ")?;
            match s.parse::<ChartKind>() {
                Ok(kind) => return Ok(kind),
                Err(_) => self.say("Invalid input. Please enter either 'line' or 'bar'.")?,
            }
        }
    }

    /// numeric menu, None on an invalid choice
    pub fn function(&mut self) -> Result<Option<Function>> {
        self.say("Select time series function:")?;
        for f in Function::ALL.iter() {
            self.say(&format!("{}. {}", f.menu_key(), f))?;
        }
        let choice = self.ask("Enter your choice: ")?;
        Ok(Function::from_menu_key(&choice))
    }

    // passed to the api as is
    pub fn interval(&mut self) -> Result<String> {
        let s = self.ask("Enter interval (1min, 5min, 15min, 30min, 60min): ")?;
        Ok(s.trim().to_owned())
    }

    /// asks for both dates until they parse and are in order
    pub fn date_range(&mut self) -> Result<DateRange> {
        loop {
            let start = self.ask("Enter start date (YYYY-MM-DD): ")?;
            let end = self.ask("Enter end date (YYYY-MM-DD): ")?;
            let parsed = parse_date(&start).and_then(|s| parse_date(&end).map(|e| (s, e)));
            match parsed {
                Err(_) => self.say("Invalid date format. Please enter in YYYY-MM-DD format.")?,
                Ok((start, end)) => match DateRange::new(start, end) {
                    Ok(range) => return Ok(range),
                    Err(_) => {
                        self.say("Error: End date cannot be before start date. Please try again.")?
                    }
                },
            }
        }
    }

    /// full sequence, None when the run should stop
    pub fn query(&mut self) -> Result<Option<Query>> {
        let symbol = self.symbol()?;
        let kind = self.chart_kind()?;
        let function = match self.function()? {
            Some(f) => f,
            None => {
                self.say("Invalid choice. Exiting.")?;
                return Ok(None);
            }
        };
        let interval = if function.is_intraday() {
            Some(self.interval()?)
        } else {
            None
        };
        let range = self.date_range()?;
        Ok(Some(Query {
            symbol,
            kind,
            function,
            interval,
            range,
        }))
    }
}
