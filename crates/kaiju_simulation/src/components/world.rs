//! Мир вокруг арены: разрушаемые здания, толпа NPC

use bevy::prelude::*;

/// Разрушаемое здание.
///
/// Пока `knocked_down == false` стоит как Fixed тело и считается
/// при выборе forced roll ("рядом много зданий"). Первый удар валит его:
/// RigidBody → Dynamic, дальше это обычный rigid body.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Destructible {
    pub knocked_down: bool,
    /// Масштаб случайного torque при падении
    pub push_force: f32,
    /// Сколько ударов получено (beam бьёт каждый тик)
    pub hits_taken: u32,
    /// Суммарная сила ударов
    pub force_taken: f32,
}

impl Default for Destructible {
    fn default() -> Self {
        Self {
            knocked_down: false,
            push_force: 300.0,
            hits_taken: 0,
            force_taken: 0.0,
        }
    }
}

impl Destructible {
    /// Регистрирует удар. Возвращает true если здание упало именно сейчас.
    pub fn register_hit(&mut self, force: Vec3) -> bool {
        self.hits_taken += 1;
        self.force_taken += force.length();

        let just_fell = !self.knocked_down;
        self.knocked_down = true;
        just_fell
    }
}

/// NPC из толпы: умирает от первого же удара (Die(force)).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct CrowdMember;
