//! Health and damage.
//!
//! The client never decides damage for other entities: for anything remote
//! this component is a rendering cache, overwritten by DAMAGE / RESPAWN
//! events from the server.

#[derive(Debug, Clone)]
pub struct Health {
    pub enabled: bool,
    pub current_hp: i32,
    pub max_hp: i32,
}

impl Health {
    pub fn new(max_hp: i32) -> Self {
        Self {
            enabled: true,
            current_hp: max_hp,
            max_hp,
        }
    }

    /// Applies damage, flooring at zero. Returns whether the entity is
    /// still alive.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current_hp = (self.current_hp - amount).max(0);
        self.is_alive()
    }

    /// Restores health, capped at `max_hp`.
    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Fraction of health remaining in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.max_hp > 0 {
            self.current_hp as f32 / self.max_hp as f32
        } else {
            0.0
        }
    }

    /// Overwrite from a server health report.
    pub fn sync(&mut self, current_hp: i32, max_hp: i32) {
        self.current_hp = current_hp;
        self.max_hp = max_hp;
    }

    pub fn restore_full(&mut self) {
        self.current_hp = self.max_hp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        let mut health = Health::new(100);
        assert!(health.take_damage(30));
        assert_eq!(health.current_hp, 70);

        assert!(!health.take_damage(200));
        assert_eq!(health.current_hp, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut health = Health::new(100);
        health.take_damage(50);
        health.heal(80);
        assert_eq!(health.current_hp, 100);
    }

    #[test]
    fn fraction_and_sync() {
        let mut health = Health::new(100);
        health.sync(25, 100);
        assert!((health.fraction() - 0.25).abs() < 1e-6);

        health.restore_full();
        assert_eq!(health.current_hp, 100);
    }
}
