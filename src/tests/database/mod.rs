mod armor;
mod characters;
mod classes;
mod equipment;
