//! Built-in command set

use std::sync::{Arc, RwLock, Weak};

use crate::application::errors::{CommandError, WeatherError};
use crate::domain::entities::{Command, CommandRegistry, Invocation};
use crate::domain::traits::{Capabilities, Clock, RandomSource, WeatherService};

/// Fixed set served by the quote command
pub const QUOTES: &[&str] = &[
    "Life is what happens when you're busy making other plans. - John Lennon",
    "Success is going from failure to failure without losing your enthusiasm. - Winston Churchill",
    "The only way to do great work is to love what you do. - Steve Jobs",
    "Simplicity is the ultimate sophistication. - Leonardo da Vinci",
    "Imagination is more important than knowledge. - Albert Einstein",
];

const NO_DESCRIPTION: &str = "No description available";

/// Build the built-in commands in registration order.
///
/// `registry` is the registry the commands will live in; help reads it at
/// call time so commands added later are listed too.
pub fn builtin_commands(
    registry: Weak<RwLock<CommandRegistry>>,
    prefix: char,
    caps: &Capabilities,
) -> Vec<Command> {
    let weather = caps.weather.clone();
    let random = caps.random.clone();
    let clock = caps.clock.clone();

    vec![
        Command::new("help", move |_| help(&registry, prefix))
            .with_description("Lists the available commands"),
        Command::new("greet", |_| Ok(greet())).with_description("Greets the user"),
        Command::new("echo", |inv| Ok(echo(inv))).with_description("Repeats your message"),
        Command::new("weather", move |inv| Ok(weather_report(weather.as_ref(), inv, prefix)))
            .with_description(format!("Gets the weather for a city (e.g. {prefix}weather Paris)")),
        Command::new("quote", move |_| Ok(quote(random.as_ref())))
            .with_description("Sends a random inspirational quote"),
        Command::new("clock", move |_| Ok(clock_reading(clock.as_ref())))
            .with_description("Shows the current time and date"),
    ]
}

fn help(registry: &Weak<RwLock<CommandRegistry>>, prefix: char) -> Result<String, CommandError> {
    let registry = registry
        .upgrade()
        .ok_or_else(|| CommandError::Internal("Registry dropped".to_string()))?;
    let registry = registry
        .read()
        .map_err(|_| CommandError::Internal("Lock poisoned".to_string()))?;

    let mut help = "Available commands:\n".to_string();
    for (name, description) in registry.list() {
        help.push_str(&format!(
            "{}{} - {}\n",
            prefix,
            name,
            description.as_deref().unwrap_or(NO_DESCRIPTION)
        ));
    }
    Ok(help)
}

fn greet() -> String {
    "Hello! How can I help you today?".to_string()
}

fn echo(inv: &Invocation) -> String {
    if inv.args.is_empty() {
        return "You said nothing to repeat!".to_string();
    }
    format!("You said: {}", inv.args)
}

fn weather_report(service: &dyn WeatherService, inv: &Invocation, prefix: char) -> String {
    let city = inv.args.trim();
    if city.is_empty() {
        return format!("Please specify a location. Example: {prefix}weather Paris");
    }

    match service.current(city) {
        Ok(report) => format!(
            "Weather in {}: {}, {:.1}°C",
            city, report.description, report.temperature
        ),
        Err(WeatherError::NotConfigured) => {
            tracing::warn!("Weather lookup requested but no API key is configured");
            "Weather service temporarily unavailable.".to_string()
        }
        Err(WeatherError::NotFound(_)) => format!("Could not find the weather for {}.", city),
        Err(e) => {
            tracing::warn!("Weather lookup for '{}' failed: {}", city, e);
            "Error while retrieving the weather data.".to_string()
        }
    }
}

fn quote(random: &dyn RandomSource) -> String {
    let index = random.pick_index(QUOTES.len()).min(QUOTES.len() - 1);
    QUOTES[index].to_string()
}

fn clock_reading(clock: &dyn Clock) -> String {
    let now = clock.now();
    format!(
        "It is currently {} on {}.",
        now.format("%H:%M:%S"),
        now.format("%d/%m/%Y")
    )
}

/// Register the built-ins into `registry`
pub fn register_builtins(registry: &Arc<RwLock<CommandRegistry>>, prefix: char, caps: &Capabilities) -> Result<(), CommandError> {
    let commands = builtin_commands(Arc::downgrade(registry), prefix, caps);
    let mut registry = registry
        .write()
        .map_err(|_| CommandError::Internal("Lock poisoned".to_string()))?;
    for command in commands {
        registry.register_command(command);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::application::errors::WeatherError;
    use crate::domain::traits::{Capabilities, Clock, RandomSource, WeatherReport, WeatherService};

    pub struct FixedClock(pub NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    /// Cycles through indices so repeated picks cover the whole set
    #[derive(Default)]
    pub struct CyclingRandom(AtomicUsize);

    impl RandomSource for CyclingRandom {
        fn pick_index(&self, len: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) % len
        }
    }

    pub struct StubWeather {
        pub result: Result<WeatherReport, WeatherError>,
        pub queries: Mutex<Vec<String>>,
    }

    impl StubWeather {
        pub fn new(result: Result<WeatherReport, WeatherError>) -> Self {
            Self {
                result,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl WeatherService for StubWeather {
        fn current(&self, location: &str) -> Result<WeatherReport, WeatherError> {
            self.queries.lock().unwrap().push(location.to_string());
            self.result.clone()
        }
    }

    pub fn capabilities(weather: Arc<StubWeather>) -> Capabilities {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap();
        Capabilities::new(weather, Arc::new(FixedClock(at)), Arc::new(CyclingRandom::default()))
    }

    pub fn sunny() -> Result<WeatherReport, WeatherError> {
        Ok(WeatherReport {
            temperature: 18.5,
            description: "clear sky".to_string(),
        })
    }
}
