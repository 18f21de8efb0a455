//! Texts shown in the rendered figure.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    De,
}

/// Labels for one locale
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub name: &'static str,
    pub distance: &'static str,
    pub diameter: &'static str,
    pub velocity: &'static str,
    pub date: &'static str,
    pub hazardous: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub objects: &'static str,
    pub earth: &'static str,
    pub asteroids: &'static str,
}

const EN: Labels = Labels {
    name: "Name",
    distance: "Distance",
    diameter: "Diameter",
    velocity: "Velocity",
    date: "Date",
    hazardous: "Hazardous",
    yes: "Yes",
    no: "No",
    objects: "objects",
    earth: "Earth",
    asteroids: "Asteroids",
};

const DE: Labels = Labels {
    name: "Name",
    distance: "Distanz",
    diameter: "Durchmesser",
    velocity: "Geschwindigkeit",
    date: "Datum",
    hazardous: "Gefährlich",
    yes: "Ja",
    no: "Nein",
    objects: "Objekte",
    earth: "Earth",
    asteroids: "Asteroids",
};

impl Locale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en_us" | "en-us" | "english" => Some(Self::En),
            "de" | "de_de" | "de-de" | "deutsch" | "german" => Some(Self::De),
            _ => None,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::De => &DE,
        }
    }

    pub fn yes_no(&self, flag: bool) -> &'static str {
        let labels = self.labels();
        if flag {
            labels.yes
        } else {
            labels.no
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}
