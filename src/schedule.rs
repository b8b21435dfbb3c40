use chrono::NaiveTime;
use std::collections::HashSet;

use crate::constants::DEFAULT_MEAL_SCHEDULE;

/// Meal names end up in marker document ids, which go into request paths
const RESERVED_NAME_CHARS: &[char] = &['/', '?', '#', '%'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMeal {
    pub name: String,
    pub time: NaiveTime,
}

/// Ordered meal name -> civil time-of-day. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSchedule(Vec<ScheduledMeal>);

impl MealSchedule {
    pub fn new<S: AsRef<str>>(entries: &[(S, S)]) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        let mut meals = Vec::with_capacity(entries.len());
        for (name, time) in entries {
            let name = name.as_ref().trim();
            let time = time.as_ref().trim();
            if name.is_empty() {
                anyhow::bail!("meal name must not be empty");
            }
            if let Some(c) = name.chars().find(|c| RESERVED_NAME_CHARS.contains(c)) {
                anyhow::bail!("meal `{name}` must not contain `{c}`");
            }
            if !seen.insert(name.to_string()) {
                anyhow::bail!("meal `{name}` is scheduled more than once");
            }
            let time = NaiveTime::parse_from_str(time, "%H:%M")
                .map_err(|e| anyhow::anyhow!("meal `{name}` has invalid time `{time}`: {e}"))?;
            meals.push(ScheduledMeal {
                name: name.to_string(),
                time,
            });
        }
        if meals.is_empty() {
            anyhow::bail!("meal schedule is empty");
        }
        Ok(Self(meals))
    }

    /// Parse `Name=HH:MM,Name=HH:MM`, keeping the declared order
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let entries = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                part.split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("schedule entry `{part}` is not Name=HH:MM"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Self::new(&entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledMeal> {
        self.0.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for MealSchedule {
    fn default() -> Self {
        let meals = DEFAULT_MEAL_SCHEDULE
            .iter()
            .filter_map(|(name, time)| {
                let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
                Some(ScheduledMeal {
                    name: name.to_string(),
                    time,
                })
            })
            .collect();
        Self(meals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_order() {
        let schedule = MealSchedule::default();
        let names: Vec<_> = schedule.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Breakfast",
                "Morning Snack",
                "Lunch",
                "Evening Snack",
                "Dinner",
                "Bedtime"
            ]
        );
        let lunch = schedule.iter().find(|m| m.name == "Lunch").unwrap();
        assert_eq!(lunch.time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_keeps_order() {
        let schedule = MealSchedule::parse("Lunch=13:00, Breakfast=08:15").unwrap();
        let names: Vec<_> = schedule.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Lunch", "Breakfast"]);
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        assert!(MealSchedule::parse("Lunch=13:00,Lunch=14:00").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_time() {
        assert!(MealSchedule::parse("Lunch=25:00").is_err());
        assert!(MealSchedule::parse("Lunch=13:61").is_err());
        assert!(MealSchedule::parse("Lunch").is_err());
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        for name in ["Lunch/Dinner", "Lunch?", "Late#2", "100%"] {
            let err = MealSchedule::parse(&format!("{name}=13:00")).unwrap_err();
            assert!(err.to_string().contains("must not contain"), "{err}");
        }
        assert!(MealSchedule::parse("Late-night Snack=23:00").is_ok());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(MealSchedule::parse("").is_err());
        assert!(MealSchedule::parse("=10:00").is_err());
    }
}
