use std::fmt;
use std::str::FromStr;

/// Temperature class of a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    VeryCold,
    Cold,
    Mild,
    Warm,
    VeryWarm,
}

/// Visual styling group of a category chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Cold,
    Base,
    Warm,
    Hot,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::VeryCold,
        Category::Cold,
        Category::Mild,
        Category::Warm,
        Category::VeryWarm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::VeryCold => "MUY_FRIO",
            Category::Cold => "FRIO",
            Category::Mild => "TEMPLADO",
            Category::Warm => "CALUROSO",
            Category::VeryWarm => "MUY_CALUROSO",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Category::VeryCold | Category::Cold => Tone::Cold,
            Category::Mild => Tone::Base,
            Category::Warm => Tone::Warm,
            Category::VeryWarm => Tone::Hot,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("{} is not a temperature category", s))
    }
}

/// Classifies a finite temperature in °C. Bands are lower-inclusive.
pub fn classify(temperature: f64) -> Category {
    if temperature < 0.0 {
        Category::VeryCold
    } else if temperature < 10.0 {
        Category::Cold
    } else if temperature < 20.0 {
        Category::Mild
    } else if temperature < 30.0 {
        Category::Warm
    } else {
        Category::VeryWarm
    }
}
