//! Text rendering of a snapshot: titled info lines next to an optional logo

use crate::catalog::{self, ItemId, RequestedItems};
use crate::data::HostInfo;
use crate::error::{HostfetchError, Result};
use crate::utils::parsing::{capitalize_first_letter, format_float, round_to_nearest_half, strip_ansi, wind_arrow};
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const DEFAULT_LOGO: &str = include_str!("../ascii/apple.txt");
const COLOR_RESET: &str = "\x1b[0m";
const CYAN_256: &str = "\x1b[38;5;039m";
const CYAN_16: &str = "\x1b[00;36m";

/// One rendered row: a title column and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub title: String,
    pub value: String,
}

impl InfoLine {
    fn blank() -> Self {
        Self {
            title: String::new(),
            value: String::new(),
        }
    }
}

/// Colour used for titles, empty when stdout is not a terminal
pub fn title_color() -> &'static str {
    // SAFETY: isatty only inspects the descriptor
    let is_tty = unsafe { libc::isatty(libc::STDOUT_FILENO) } == 1;
    if !is_tty {
        return "";
    }
    let term = std::env::var("TERM").unwrap_or_default();
    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    if term.contains("256color") || colorterm == "truecolor" || colorterm == "24bit" {
        CYAN_256
    } else {
        CYAN_16
    }
}

/// Logo lines from `path`, or the built-in logo.
///
/// Empty lines and `//` comments are skipped.
pub fn load_logo(path: Option<&Path>) -> Result<Vec<String>> {
    let data = match path {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_LOGO.to_string(),
    };
    let lines: Vec<String> = data
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(String::from)
        .collect();
    if lines.is_empty() {
        return Err(HostfetchError::Parse("invalid logo (empty)".to_string()));
    }
    Ok(lines)
}

fn item_title(id: ItemId, nerd: bool) -> String {
    let item = catalog::item(id);
    if nerd {
        format!("{} {}", item.nerd, item.title)
    } else {
        item.title.to_string()
    }
}

fn or_unknown<T>(value: Option<&T>, render: impl FnOnce(&T) -> String) -> String {
    value.map(render).unwrap_or_else(|| "Unknown".to_string())
}

/// Info lines for the requested items, in request order
pub fn info_lines(info: &HostInfo, items: &RequestedItems, nerd: bool) -> Vec<InfoLine> {
    let mut lines = Vec::new();
    for id in items.iter() {
        let title = item_title(id, nerd);
        let mut push = |title: String, value: String| lines.push(InfoLine { title, value });

        match id {
            ItemId::User => push(
                title,
                or_unknown(info.user.as_ref(), |user| format!("{} ({})", user.real_name, user.login)),
            ),
            ItemId::Hostname => push(title, or_unknown(info.hostname.as_ref(), String::clone)),
            ItemId::Os => push(
                title,
                or_unknown(info.os.as_ref(), |os| {
                    format!(
                        "{} {} {} ({}) {} {}",
                        os.system,
                        os.system_version_code_name,
                        os.system_version,
                        os.system_build,
                        os.kernel_type,
                        os.kernel_version
                    )
                }),
            ),
            ItemId::SystemIntegrity => push(
                title,
                or_unknown(info.system_integrity.as_ref(), |sip| {
                    capitalize_first_letter(sip.trim_start_matches("integrity_"))
                }),
            ),
            ItemId::SerialNumber => push(title, or_unknown(info.cached.serial_number.as_ref(), String::clone)),
            ItemId::Model => push(
                title,
                or_unknown(info.cached.model.as_ref(), |model| {
                    format!("{} {} ({}) {}", model.name, model.sub_name, model.date, model.number)
                }),
            ),
            ItemId::Cpu => push(
                title,
                or_unknown(info.cached.cpu.as_ref(), |cpu| {
                    if cpu.model.starts_with("Apple") {
                        format!(
                            "{} {} cores ({} P and {} E)",
                            cpu.model, cpu.cores, cpu.performance_cores, cpu.efficiency_cores
                        )
                    } else {
                        // Intel models already carry the core count
                        cpu.model.clone()
                    }
                }),
            ),
            ItemId::Gpu => push(title, or_unknown(info.cached.gpu_cores.as_ref(), |cores| format!("{} cores", cores))),
            ItemId::Memory => push(
                title,
                or_unknown(info.cached.memory.as_ref(), |memory| {
                    format!("{} {} {}", memory.amount, memory.unit, memory.mem_type)
                }),
            ),
            ItemId::Disk => match &info.disk {
                Some(disk) => {
                    push(
                        title.clone(),
                        format!("{:.2} TB ({:.2} TB available)", disk.total_tb, disk.free_tb),
                    );
                    push(format!("{} SMART", title), disk.smart_status.clone());
                }
                None => push(title, "Unknown".to_string()),
            },
            ItemId::Battery => match &info.battery {
                Some(battery) => {
                    let charging = if battery.charging { "(charging)" } else { "(discharging)" };
                    push(
                        title.clone(),
                        format!(
                            "{}% {} | {}% capacity",
                            battery.status_percent, charging, battery.capacity_percent
                        ),
                    );
                    push(format!("{} health", title), battery.health.clone());
                }
                None => push(title, "Unknown".to_string()),
            },
            ItemId::Display => {
                let displays = info.displays.as_deref().unwrap_or_default();
                if displays.is_empty() {
                    push(title.clone(), "Unknown".to_string());
                }
                for (index, display) in displays.iter().enumerate() {
                    push(
                        format!("{} #{}", title, index + 1),
                        format!(
                            "{} x {} | {} x {} @ {:.0} Hz",
                            display.pixels_width,
                            display.pixels_height,
                            display.resolution_width,
                            display.resolution_height,
                            display.refresh_rate_hz
                        ),
                    );
                }
            }
            ItemId::Terminal => push(title, or_unknown(info.terminal.as_ref(), String::clone)),
            ItemId::Software => push(
                title,
                or_unknown(info.software.as_ref(), |software| {
                    format!(
                        "{} Apps | {} Formulae | {} Casks",
                        software.num_apps, software.num_brew_formulae, software.num_brew_casks
                    )
                }),
            ),
            ItemId::PublicIp => push(
                title,
                or_unknown(info.public_ip.as_ref(), |ip| {
                    if ip.country.is_empty() {
                        ip.ip.clone()
                    } else {
                        format!("{} ({})", ip.ip, ip.country)
                    }
                }),
            ),
            ItemId::Uptime => push(title, or_unknown(info.uptime.as_ref(), String::clone)),
            ItemId::Datetime => push(title, or_unknown(info.datetime.as_ref(), String::clone)),
            ItemId::Weather => match &info.weather {
                Some(weather) => {
                    let location = if weather.location_name.is_empty() {
                        format!("({}, {})", weather.latitude, weather.longitude)
                    } else {
                        format!("{}, {}", weather.location_name, weather.location_country_code)
                    };
                    push(title, format!("{}: {}", location, weather.current_weather));
                    let wind_title = if nerd { "\u{f2c9} Temp. | Wind" } else { "Temp. | Wind" };
                    push(
                        wind_title.to_string(),
                        format!(
                            "{} ({}) {} | {} {:.0} ({:.0}) {}",
                            format_float(round_to_nearest_half(weather.temperature)),
                            format_float(round_to_nearest_half(weather.feels_like)),
                            weather.temp_unit,
                            wind_arrow(weather.wind_direction),
                            weather.wind_speed,
                            weather.wind_gusts,
                            weather.wind_unit
                        ),
                    );
                }
                None => push(title, "Unknown".to_string()),
            },
        }
    }
    lines
}

/// Pad every line to the widest one, ignoring ANSI sequences
fn pad_logo(logo: &[String]) -> (Vec<String>, usize) {
    let width = logo
        .iter()
        .map(|line| UnicodeWidthStr::width(strip_ansi(line).as_str()))
        .max()
        .unwrap_or(0);
    let padded = logo
        .iter()
        .map(|line| {
            let visible = UnicodeWidthStr::width(strip_ansi(line).as_str());
            format!("{}{}{}", line, COLOR_RESET, " ".repeat(width - visible))
        })
        .collect();
    (padded, width)
}

fn centred<T: Clone>(rows: Vec<T>, blank: T, top: usize, bottom: usize) -> Vec<T> {
    let mut out = vec![blank.clone(); top];
    out.extend(rows);
    out.extend(std::iter::repeat(blank).take(bottom));
    out
}

/// Lay out info lines, optionally next to a vertically centred logo
pub fn render(lines: &[InfoLine], logo: Option<&[String]>, color: &str) -> String {
    let title_width = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(line.title.as_str()))
        .max()
        .unwrap_or(0)
        + 1;
    let reset = if color.is_empty() { "" } else { COLOR_RESET };
    let format_line = |line: &InfoLine| {
        if line.title.is_empty() && line.value.is_empty() {
            return String::new();
        }
        let pad = title_width - UnicodeWidthStr::width(line.title.as_str());
        format!("{}{}{}{}{}", color, line.title, " ".repeat(pad), reset, line.value)
    };

    let mut output = String::new();
    let Some(logo) = logo else {
        for line in lines {
            output.push_str(&format_line(line));
            output.push('\n');
        }
        return output;
    };

    let (logo_lines, logo_width) = pad_logo(logo);

    // Centre the shorter column against the taller one
    let total = logo_lines.len().max(lines.len());
    let shorter = logo_lines.len().min(lines.len());
    let top = (total - shorter) / 2;
    let bottom = total - shorter - top;
    let (logo_lines, info) = if logo_lines.len() > lines.len() {
        (logo_lines, centred(lines.to_vec(), InfoLine::blank(), top, bottom))
    } else {
        (centred(logo_lines, " ".repeat(logo_width), top, bottom), lines.to_vec())
    };

    for (logo_line, line) in logo_lines.iter().zip(&info) {
        let text = format!("{}  {}", logo_line, format_line(line));
        output.push_str(text.trim_end());
        output.push('\n');
    }
    output
}
