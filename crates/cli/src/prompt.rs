//! Line-based prompts.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use lasambus_core::constants::LAGOS_LGAS;
use lasambus_core::report_flow::IncidentForm;

/// Asks questions on `input` and writes prompts to `output`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Prints `question` and reads one trimmed line. `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question. Only `y` or `yes` (any case) count as yes; end of input is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }

    /// Collects a report form field by field. `None` if input ends part way.
    pub fn fill_form(&mut self) -> io::Result<Option<IncidentForm>> {
        self.edit_form(IncidentForm::default())
    }

    /// Walks through `form`; a blank answer keeps the value shown in brackets.
    pub fn edit_form(&mut self, mut form: IncidentForm) -> io::Result<Option<IncidentForm>> {
        let fields: [(&str, &mut String); 7] = [
            ("Patient name", &mut form.patient_name),
            ("Patient age (optional)", &mut form.patient_age),
            ("Patient sex (Male/Female)", &mut form.patient_sex),
            ("Location", &mut form.location),
            ("LGA (? to list)", &mut form.lga),
            ("Description", &mut form.description),
            ("Action taken", &mut form.action_taken),
        ];

        for (label, slot) in fields {
            let question = if slot.is_empty() {
                format!("{label}:")
            } else {
                format!("{label} [{slot}]:")
            };
            loop {
                let Some(answer) = self.ask(&question)? else {
                    return Ok(None);
                };
                if answer == "?" {
                    writeln!(self.output, "{}", LAGOS_LGAS.join(", "))?;
                    continue;
                }
                if !answer.is_empty() {
                    *slot = answer;
                }
                break;
            }
        }
        Ok(Some(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn confirm_accepts_only_yes() {
        assert!(prompt("y\n").confirm("Transfer?").unwrap());
        assert!(prompt("YES\n").confirm("Transfer?").unwrap());
        assert!(!prompt("n\n").confirm("Transfer?").unwrap());
        assert!(!prompt("maybe\n").confirm("Transfer?").unwrap());
        assert!(!prompt("").confirm("Transfer?").unwrap());
    }

    #[test]
    fn fill_form_reads_every_field_and_lists_lgas() {
        let mut p = prompt("Bola\n\nFemale\nOshodi\n?\nOshodi-Isolo\nFainted\nRecovery position\n");

        let form = p.fill_form().unwrap().expect("complete form");

        assert_eq!(form.patient_name, "Bola");
        assert_eq!(form.patient_age, "");
        assert_eq!(form.lga, "Oshodi-Isolo");
        assert_eq!(form.action_taken, "Recovery position");
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("Agege, Ajeromi-Ifelodun"));
    }

    #[test]
    fn fill_form_stops_at_end_of_input() {
        assert_eq!(prompt("Bola\n34\n").fill_form().unwrap(), None);
    }

    #[test]
    fn edit_form_keeps_values_on_blank_answers() {
        let mut p = prompt("\n\n\n\nIkeja\n\n\n");
        let before = IncidentForm {
            patient_name: "Bola".into(),
            lga: "Ikeja GRA".into(),
            ..Default::default()
        };

        let form = p.edit_form(before).unwrap().expect("complete form");

        assert_eq!(form.patient_name, "Bola");
        assert_eq!(form.lga, "Ikeja");
        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("Patient name [Bola]:"));
    }
}
