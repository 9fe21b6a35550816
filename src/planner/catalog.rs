//! Meal catalog
//!
//! Static table of one breakfast, lunch and dinner per (goal, budget tier).
//! Built once on first use and never mutated.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::models::{BudgetTier, Goal, Meal, MealSlot};

use super::{PlanError, PlanResult};

/// The three meals for one (goal, tier) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealSet {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

impl MealSet {
    pub fn get(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }
}

/// Meals keyed by (goal, budget tier)
#[derive(Debug, Clone, Default)]
pub struct MealCatalog {
    sets: HashMap<(Goal, BudgetTier), MealSet>,
}

impl MealCatalog {
    /// Build a catalog from explicit entries
    pub fn from_entries(entries: impl IntoIterator<Item = ((Goal, BudgetTier), MealSet)>) -> Self {
        Self {
            sets: entries.into_iter().collect(),
        }
    }

    /// The built-in catalog covering every goal and tier
    pub fn standard() -> &'static MealCatalog {
        static CATALOG: OnceLock<MealCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| MealCatalog::from_entries(standard_entries()))
    }

    /// Meals for a goal at a budget tier
    pub fn lookup(&self, goal: Goal, tier: BudgetTier) -> PlanResult<&MealSet> {
        self.sets.get(&(goal, tier)).ok_or_else(|| PlanError::NotFound {
            goal: goal.as_str().to_string(),
            tier: tier.as_str().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

fn set(breakfast: Meal, lunch: Meal, dinner: Meal) -> MealSet {
    MealSet {
        breakfast,
        lunch,
        dinner,
    }
}

fn standard_entries() -> Vec<((Goal, BudgetTier), MealSet)> {
    use BudgetTier::{High, Low, Medium};
    use Goal::{Endurance, Maintenance, MuscleGain, WeightLoss};

    vec![
        // ---- Weight loss ----
        (
            (WeightLoss, Low),
            set(
                Meal::new("Oatmeal with Berries", 300, 10, 50, 5, 2.50, &["1/2 cup oats", "1/2 cup mixed berries", "1 tsp honey"]),
                Meal::new("Grilled Chicken Salad", 400, 35, 20, 15, 5.00, &["4oz grilled chicken breast", "Mixed greens", "Cherry tomatoes", "Balsamic vinegar"]),
                Meal::new("Baked Fish with Vegetables", 450, 40, 25, 12, 6.00, &["6oz white fish", "Roasted broccoli", "Steamed carrots", "Lemon"]),
            ),
        ),
        (
            (WeightLoss, Medium),
            set(
                Meal::new("Greek Yogurt Parfait", 350, 20, 45, 8, 4.00, &["1 cup Greek yogurt", "Granola", "Fresh berries", "Almonds"]),
                Meal::new("Turkey & Avocado Wrap", 420, 30, 35, 18, 6.50, &["Whole wheat tortilla", "4oz turkey breast", "1/4 avocado", "Spinach", "Tomato"]),
                Meal::new("Salmon with Quinoa", 480, 38, 30, 20, 8.50, &["5oz salmon fillet", "1/2 cup quinoa", "Asparagus", "Olive oil"]),
            ),
        ),
        (
            (WeightLoss, High),
            set(
                Meal::new("Protein Smoothie Bowl", 380, 25, 48, 10, 6.00, &["Protein powder", "Acai", "Banana", "Chia seeds", "Fresh fruit toppings"]),
                Meal::new("Grass-fed Steak Salad", 450, 40, 20, 22, 12.00, &["5oz grass-fed steak", "Arugula", "Goat cheese", "Walnuts", "Balsamic reduction"]),
                Meal::new("Sea Bass with Vegetables", 500, 42, 28, 18, 15.00, &["6oz sea bass", "Grilled asparagus", "Sweet potato", "Herb butter"]),
            ),
        ),
        // ---- Muscle gain ----
        (
            (MuscleGain, Low),
            set(
                Meal::new("Eggs & Whole Wheat Toast", 500, 28, 45, 20, 3.00, &["3 whole eggs", "2 slices whole wheat toast", "Peanut butter"]),
                Meal::new("Chicken Rice Bowl", 650, 45, 70, 15, 5.50, &["6oz chicken breast", "1 cup brown rice", "Black beans", "Salsa"]),
                Meal::new("Ground Beef Pasta", 700, 48, 75, 22, 6.50, &["6oz lean ground beef", "Whole wheat pasta", "Marinara sauce", "Vegetables"]),
            ),
        ),
        (
            (MuscleGain, Medium),
            set(
                Meal::new("Protein Pancakes", 550, 35, 60, 15, 5.00, &["Protein powder", "Oat flour", "Eggs", "Banana", "Maple syrup"]),
                Meal::new("Steak & Sweet Potato", 720, 50, 65, 25, 9.00, &["6oz sirloin steak", "Large sweet potato", "Green beans", "Butter"]),
                Meal::new("Chicken Stir-Fry", 680, 52, 70, 18, 7.50, &["7oz chicken breast", "Mixed vegetables", "Brown rice", "Teriyaki sauce"]),
            ),
        ),
        (
            (MuscleGain, High),
            set(
                Meal::new("Steak & Eggs", 600, 48, 35, 28, 10.00, &["5oz ribeye steak", "3 eggs", "Hash browns", "Avocado"]),
                Meal::new("Salmon Poke Bowl", 750, 55, 75, 22, 14.00, &["7oz salmon", "Sushi rice", "Edamame", "Seaweed", "Avocado"]),
                Meal::new("Lamb Chops with Quinoa", 780, 58, 60, 30, 18.00, &["8oz lamb chops", "Quinoa pilaf", "Grilled vegetables", "Mint sauce"]),
            ),
        ),
        // ---- Maintenance ----
        (
            (Maintenance, Low),
            set(
                Meal::new("Scrambled Eggs & Toast", 400, 20, 40, 15, 2.80, &["2 eggs", "2 slices whole grain toast", "Butter", "Orange juice"]),
                Meal::new("Chicken Sandwich", 500, 32, 50, 18, 5.00, &["4oz chicken breast", "Whole wheat bun", "Lettuce", "Tomato", "Mayo"]),
                Meal::new("Spaghetti with Meatballs", 600, 35, 65, 20, 6.00, &["Pasta", "Turkey meatballs", "Marinara sauce", "Parmesan"]),
            ),
        ),
        (
            (Maintenance, Medium),
            set(
                Meal::new("Avocado Toast with Eggs", 450, 22, 42, 22, 5.50, &["2 slices sourdough", "1/2 avocado", "2 poached eggs", "Everything seasoning"]),
                Meal::new("Buddha Bowl", 550, 28, 60, 20, 8.00, &["Quinoa", "Chickpeas", "Sweet potato", "Kale", "Tahini dressing"]),
                Meal::new("Chicken Fajitas", 580, 38, 55, 22, 7.50, &["5oz chicken", "Bell peppers", "Onions", "Tortillas", "Guacamole"]),
            ),
        ),
        (
            (Maintenance, High),
            set(
                Meal::new("Smoked Salmon Bagel", 480, 25, 50, 20, 8.00, &["Everything bagel", "Smoked salmon", "Cream cheese", "Capers", "Red onion"]),
                Meal::new("Sushi Platter", 600, 30, 70, 18, 15.00, &["Assorted nigiri", "California roll", "Edamame", "Miso soup"]),
                Meal::new("Pan-Seared Duck Breast", 650, 42, 45, 28, 20.00, &["Duck breast", "Wild rice", "Roasted root vegetables", "Cherry reduction"]),
            ),
        ),
        // ---- Endurance ----
        (
            (Endurance, Low),
            set(
                Meal::new("Banana Oatmeal", 450, 12, 80, 8, 2.50, &["Oats", "2 bananas", "Honey", "Cinnamon"]),
                Meal::new("Pasta Primavera", 600, 20, 95, 12, 5.00, &["Whole wheat pasta", "Mixed vegetables", "Olive oil", "Garlic"]),
                Meal::new("Chicken & Rice", 650, 40, 85, 12, 6.00, &["5oz chicken", "White rice", "Steamed broccoli", "Soy sauce"]),
            ),
        ),
        (
            (Endurance, Medium),
            set(
                Meal::new("Energy Smoothie", 500, 20, 85, 10, 5.00, &["Banana", "Dates", "Protein powder", "Almond milk", "Spinach", "Oats"]),
                Meal::new("Turkey & Sweet Potato", 650, 38, 90, 14, 7.50, &["6oz turkey breast", "Large sweet potato", "Green beans", "Cranberry sauce"]),
                Meal::new("Salmon Pasta", 700, 42, 88, 18, 9.00, &["5oz salmon", "Whole wheat pasta", "Spinach", "Lemon cream sauce"]),
            ),
        ),
        (
            (Endurance, High),
            set(
                Meal::new("Athlete Power Bowl", 550, 25, 90, 12, 8.00, &["Acai bowl", "Granola", "Fruits", "Honey", "Chia seeds", "Almond butter"]),
                Meal::new("Grilled Chicken Grain Bowl", 700, 45, 95, 16, 12.00, &["6oz chicken", "Quinoa", "Farro", "Roasted vegetables", "Tahini"]),
                Meal::new("Venison with Wild Rice", 750, 50, 92, 18, 18.00, &["7oz venison", "Wild rice blend", "Brussels sprouts", "Berry compote"]),
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_complete() {
        let catalog = MealCatalog::standard();
        assert_eq!(catalog.len(), Goal::ALL.len() * BudgetTier::ALL.len());

        for goal in Goal::ALL {
            for tier in BudgetTier::ALL {
                let meals = catalog.lookup(goal, tier).unwrap();
                for slot in MealSlot::ALL {
                    let meal = meals.get(slot);
                    assert!(!meal.name.is_empty());
                    assert!(!meal.ingredients.is_empty());
                    assert!(meal.calories > 0);
                }
            }
        }
    }

    #[test]
    fn test_lookup_known_entry() {
        let meals = MealCatalog::standard()
            .lookup(Goal::MuscleGain, BudgetTier::High)
            .unwrap();
        assert_eq!(meals.breakfast.name, "Steak & Eggs");
        assert_eq!(meals.lunch.calories, 750);
        assert_eq!(meals.dinner.cost_usd, 18.00);
        assert_eq!(meals.get(MealSlot::Lunch), &meals.lunch);
    }

    #[test]
    fn test_lookup_missing_is_not_found() {
        let catalog = MealCatalog::from_entries(vec![(
            (Goal::Maintenance, BudgetTier::Low),
            MealCatalog::standard()
                .lookup(Goal::Maintenance, BudgetTier::Low)
                .unwrap()
                .clone(),
        )]);

        assert!(catalog.lookup(Goal::Maintenance, BudgetTier::Low).is_ok());
        assert_eq!(
            catalog.lookup(Goal::Endurance, BudgetTier::High),
            Err(PlanError::NotFound {
                goal: "endurance".to_string(),
                tier: "high".to_string(),
            })
        );
        assert!(MealCatalog::default().is_empty());
    }

    #[test]
    fn test_higher_tiers_cost_more() {
        let catalog = MealCatalog::standard();
        for goal in Goal::ALL {
            let cost = |tier| {
                let set = catalog.lookup(goal, tier).unwrap();
                set.breakfast.cost_usd + set.lunch.cost_usd + set.dinner.cost_usd
            };
            assert!(cost(BudgetTier::Low) < cost(BudgetTier::Medium));
            assert!(cost(BudgetTier::Medium) < cost(BudgetTier::High));
        }
    }
}
