/// Curated per-planet content module
use crate::domain::{Mission, MissionKind, MissionStatus};
use crate::resolver::Planet;

/// Short blurb shown on list cards
pub fn summary_description(planet: Planet) -> &'static str {
    match planet {
        Planet::Mercury => "El planeta más cercano al Sol y el más pequeño del sistema solar.",
        Planet::Venus => "El segundo planeta desde el Sol, conocido por su atmósfera tóxica.",
        Planet::Earth => "Nuestro hogar, el único planeta conocido con vida.",
        Planet::Mars => "El planeta rojo, objetivo de futuras misiones tripuladas.",
        Planet::Jupiter => "El gigante gaseoso más grande del sistema solar.",
        Planet::Saturn => "Famoso por sus espectaculares anillos.",
        Planet::Uranus => "Un gigante de hielo que rota de lado.",
        Planet::Neptune => "El planeta más lejano y ventoso del sistema solar.",
    }
}

/// Long description for the detail page
pub fn detail_description(planet: Planet) -> &'static str {
    match planet {
        Planet::Mercury => "Mercurio es el planeta más pequeño y el más cercano al Sol. Su superficie está llena de cráteres similares a los de la Luna.",
        Planet::Venus => "Venus es el segundo planeta desde el Sol y el más caliente del Sistema Solar debido a su densa atmósfera de dióxido de carbono.",
        Planet::Earth => "La Tierra es el tercer planeta desde el Sol y el único conocido que alberga vida, con agua líquida en su superficie.",
        Planet::Mars => "Marte, el planeta rojo, es el cuarto planeta desde el Sol y el objetivo principal de futuras misiones tripuladas.",
        Planet::Jupiter => "Júpiter es el planeta más grande del Sistema Solar, un gigante gaseoso con decenas de lunas conocidas.",
        Planet::Saturn => "Saturno es famoso por su sistema de anillos y es el segundo planeta más grande del Sistema Solar.",
        Planet::Uranus => "Urano es un gigante de hielo cuyo eje de rotación está inclinado casi 90 grados.",
        Planet::Neptune => "Neptuno es el planeta más lejano del Sol y tiene los vientos más rápidos del Sistema Solar.",
    }
}

pub fn interesting_facts(planet: Planet) -> Vec<String> {
    let facts: &[&str] = match planet {
        Planet::Mercury => &[
            "Un año en Mercurio dura solo 88 días terrestres",
            "Las temperaturas varían entre -173°C y 427°C",
            "No tiene satélites naturales",
        ],
        Planet::Venus => &[
            "Es el planeta más caliente del Sistema Solar",
            "Rota en dirección contraria a la mayoría de planetas",
            "Un día en Venus dura más que un año venusiano",
        ],
        Planet::Earth => &[
            "Es el único planeta conocido con vida",
            "El 71% de su superficie está cubierta por agua",
            "Su núcleo de hierro líquido genera un campo magnético",
        ],
        Planet::Mars => &[
            "Tiene el volcán más grande del Sistema Solar: Olympus Mons",
            "Sus días duran aproximadamente 24 horas y 37 minutos",
            "Hay evidencia de agua líquida en el pasado",
        ],
        Planet::Jupiter => &[
            "Es más masivo que todos los otros planetas combinados",
            "Su Gran Mancha Roja es una tormenta que dura siglos",
            "Tiene un sistema de anillos débiles",
        ],
        Planet::Saturn => &[
            "Tiene el sistema de anillos más prominente",
            "Es menos denso que el agua",
            "Su luna Titán tiene lagos de metano",
        ],
        Planet::Uranus => &[
            "Rota de lado con una inclinación de 98 grados",
            "Es el planeta más frío del Sistema Solar",
            "Fue el primer planeta descubierto con telescopio",
        ],
        Planet::Neptune => &[
            "Tiene los vientos más rápidos: hasta 2.100 km/h",
            "Un año neptuniano dura 165 años terrestres",
            "Fue descubierto mediante predicciones matemáticas",
        ],
    };
    facts.iter().map(|f| f.to_string()).collect()
}

fn mission(
    name: &str,
    agency: &str,
    launch_date: &str,
    status: MissionStatus,
    kind: MissionKind,
) -> Mission {
    Mission {
        name: name.to_string(),
        agency: agency.to_string(),
        launch_date: launch_date.to_string(),
        status,
        kind,
    }
}

pub fn missions(planet: Planet) -> Vec<Mission> {
    use MissionKind::*;
    use MissionStatus::*;

    match planet {
        Planet::Mercury => vec![
            mission("MESSENGER", "NASA", "2004-08-03", Completed, Orbiter),
            mission("BepiColombo", "ESA/JAXA", "2018-10-20", Active, Orbiter),
        ],
        Planet::Venus => vec![
            mission("Venera Program", "Roscosmos", "1961-1984", Completed, Lander),
            mission("Parker Solar Probe", "NASA", "2018-08-12", Active, Flyby),
        ],
        Planet::Earth => vec![mission(
            "ISS",
            "NASA/Roscosmos/ESA",
            "1998-11-20",
            Active,
            Orbiter,
        )],
        Planet::Mars => vec![
            mission("Perseverance", "NASA", "2020-07-30", Active, Rover),
            mission("Ingenuity", "NASA", "2020-07-30", Completed, Rover),
        ],
        Planet::Jupiter => vec![
            mission("Juno", "NASA", "2011-08-05", Active, Orbiter),
            mission("Europa Clipper", "NASA", "2024-10-14", Active, Orbiter),
        ],
        Planet::Saturn => vec![mission(
            "Cassini-Huygens",
            "NASA/ESA",
            "1997-10-15",
            Completed,
            Orbiter,
        )],
        Planet::Uranus => vec![
            mission("Voyager 2", "NASA", "1977-08-20", Completed, Flyby),
            mission("Uranus Orbiter", "NASA", "2030-2035", Planned, Orbiter),
        ],
        Planet::Neptune => vec![mission("Voyager 2", "NASA", "1977-08-20", Completed, Flyby)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_planet_has_content() {
        for planet in Planet::ALL {
            assert!(!summary_description(planet).is_empty());
            assert!(!detail_description(planet).is_empty());
            assert!(!interesting_facts(planet).is_empty());
            assert!(!missions(planet).is_empty());
        }
    }
}
