use crate::choreography::{Action, FlyTarget, Section};
use crate::layers::{BuildingColumn, LayerFilter, MapLayer};
use crate::media::VideoClip;
use crate::models::LngLat;

macro_rules! clip {
    ($file:literal, $caption:literal, $thumb:literal) => {
        VideoClip {
            src: concat!("http://texty.org.ua/video/maidan_maps/", $file),
            caption: $caption,
            thumbnail: concat!("img/", $thumb),
        }
    };
}

/// Looping backdrop behind the title; no caption or minimap.
pub const BACKGROUND: VideoClip = VideoClip {
    src: "http://texty.org.ua/video/maidan_maps/maidan-bg-blacked.mp4",
    caption: "",
    thumbnail: "",
};
pub const MARIINKA_START: VideoClip = clip!(
    "mariinka-start.mp4",
    "Початок протистояння в Маріїнському парк",
    "minimap-mariinka-start.png"
);
pub const GRUSHEVSKOGO_9: VideoClip = clip!(
    "grushevskogo9.mp4",
    "Тітушки та силовики добивають поранених протестувальників біля будинку №9 на вул. Грушевського",
    "minimap-grushevskogo9.png"
);
pub const GAS_KRIPOSNYI: VideoClip = clip!(
    "gas-kriposnyi.mp4",
    "Леонід Бібік намагається розчистити дорогу за допомогою міліцейського ГАЗу",
    "minimap-gas-kriposnyi.png"
);
pub const SHOVKOVYCHNA: VideoClip = clip!(
    "shovkovychna.mp4",
    "Протистояння на перехресті Інститутська-Шовковична",
    "minimap-shovkovychna.png"
);
pub const BTRS: VideoClip = clip!("btrs.mp4", "БТРи таранять барикади", "minimap-btrs.png");
pub const ANTHEM: VideoClip = clip!(
    "anthem-18.mp4",
    "Штурм барикад 18 лютого. Відео BABYLON'13",
    "minimap-anthem.png"
);
pub const UNIONS_FIRE: VideoClip = clip!(
    "unions-fire.mp4",
    "Порятунок протестувальників з будинку профспілок. Відео BABYLON'13",
    "minimap-unions-fire.png"
);
pub const EXPLOSIONS_18: VideoClip = clip!(
    "explosions-18.mp4",
    "Палаючі барикади. Відео BABYLON'13",
    "minimap-explosions-18.png"
);
pub const DAY_19: VideoClip = clip!(
    "day-19.mp4",
    "Ранок на Майдані 19 лютого. Відео BABYLON'13",
    "minimap-day-19.png"
);
pub const EXPLOSION_20: VideoClip = clip!(
    "explosion-20.mp4",
    "Майдан намагається повернути позиції. Між 8 та 9 ранку 20 січня",
    "minimap-explosion-20.png"
);
pub const RETREAT_20: VideoClip = clip!(
    "retreat-20.mp4",
    "Відступ силовиків до урядового кварталу ~9:10 20 січня",
    "minimap-retreat-20.png"
);
pub const INSTYTUTSKA_0913: VideoClip = clip!(
    "instytutska-0913.mp4",
    "Снайпери з жовтими пов'язками стріляють в натовп. ~9:13 20 лютого",
    "minimap-instytutska-0913.png"
);
pub const INSTYTUTSKA_0922: VideoClip = clip!(
    "instytutska-0922.mp4",
    "Смерть Андрія Дигдаловича, 09:22:51 20 лютого",
    "minimap-instytutska-0922.png"
);
pub const INSTYTUTSKA_1001: VideoClip = clip!(
    "instytutska-1001.mp4",
    "Eпіцентр розстрілів, ~10:01 20 лютого",
    "minimap-instytutska-1001.png"
);

const THREE_CAMPS: &[&str] = &["maidan", "berkut", "chorna-rota"];
const TWO_CAMPS: &[&str] = &["maidan", "berkut"];
const FINALE_SHAPES: [&str; 4] = ["maidan", "mvs", "padmin", "berkut"];

/// Shared camera for the Trade Unions building close-up.
const UNIONS_VIEW: FlyTarget = FlyTarget::To {
    center: LngLat::new(30.522290, 50.450731),
    zoom_factor: 1.05,
    bearing: 20.0,
    pitch: 0.0,
};
const INSTYTUTSKA_VIEW: FlyTarget = FlyTarget::To {
    center: LngLat::new(30.527048, 50.448768),
    zoom_factor: 1.17,
    bearing: 10.0,
    pitch: 10.0,
};

fn popup(lon: f64, lat: f64, text: &'static str) -> Action {
    Action::Popup {
        at: LngLat::new(lon, lat),
        text,
    }
}

fn reveal(from: &'static str, to: &'static str, announce: bool) -> Action {
    Action::Reveal { from, to, announce }
}

fn morph(key: &'static str, ids: &'static [&'static str]) -> Action {
    Action::Morph { key, ids }
}

fn attack(color: &'static str, ids: &'static [&'static str]) -> Action {
    Action::AttackLine { color, ids }
}

fn opacity(layer: MapLayer, value: f64) -> Action {
    Action::Paint {
        layer,
        property: layer.opacity_property(),
        value,
    }
}

fn fights(times: &[u32]) -> Action {
    Action::Filter(MapLayer::Fights, LayerFilter::TimeIn(times.to_vec()))
}

fn shape_opacity(id: &'static str, opacity: f64, duration_ms: f64) -> Action {
    Action::ShapeOpacity { id, opacity, duration_ms }
}

fn fly(center: LngLat, zoom_factor: f64, bearing: f64, pitch: f64) -> Action {
    Action::Fly(FlyTarget::To {
        center,
        zoom_factor,
        bearing,
        pitch,
    })
}

/// A section that plays `clip` going down and stops it going up.
fn video_in(id: &'static str, offset: f64, clip: VideoClip) -> Section {
    Section::new(id, offset)
        .on_down(Action::PlayVideo(clip))
        .on_up(Action::StopVideo)
}

/// A section that stops `clip` going down and replays it going up.
fn video_out(id: &'static str, offset: f64, clip: VideoClip) -> Section {
    Section::new(id, offset)
        .on_down(Action::StopVideo)
        .on_up(Action::PlayVideo(clip))
}

pub fn sections() -> Vec<Section> {
    let mut s = vec![
        Section::new("one", 300.0)
            .then(Action::StopVideo)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-01-01 14:00:00", "2014-01-23 14:00:00", false))
            .then(popup(30.5299169, 50.4505057, "Нігоян, Сеник, Жизневський"))
            .then(popup(30.524515, 50.449412, "територія Майдану"))
            .then(popup(30.536166, 50.446939, "територія силовиків і Антимайдану"))
            .on_up(Action::PlayVideo(BACKGROUND))
            .on_up(Action::Fly(FlyTarget::Home))
            .on_up(opacity(MapLayer::Barricade, 0.0)),
        Section::new("two", 150.0)
            .then(Action::FadeOutPopups)
            .then(popup(30.528463, 50.451366, "барикади"))
            .then(popup(30.535909, 50.447964, "шеренги силовиків"))
            .on_down(opacity(MapLayer::Barricade, 0.8))
            .on_up(shape_opacity("mariinka", 0.0, 0.0))
            .on_up(morph("geo181000", &["maidan"]))
            .on_up(Action::FadeOutLines),
        Section::new("three", 150.0)
            .on_down(morph("geo181012", &["maidan"]))
            .on_down(Action::FadeOutPopups)
            .on_down(Action::After {
                delay_ms: 2000.0,
                actions: vec![
                    shape_opacity("mariinka", 0.2, 500.0),
                    attack("#9ebcda", &["protestline"]),
                ],
            })
            .on_up(opacity(MapLayer::Fights, 0.0)),
        Section::new("four", 150.0)
            .on_down(Action::Filter(MapLayer::Fights, LayerFilter::TimeEq(1012)))
            .on_down(Action::After {
                delay_ms: 2500.0,
                actions: vec![popup(30.534752, 50.445804, "сутички"), opacity(MapLayer::Fights, 1.0)],
            }),
        Section::new("five", 150.0)
            .then(attack("#650149", &["bline_181012"]))
            .then(popup(30.535651, 50.446638, "колона силовиків"))
            .on_up(Action::ShowBuildings(BuildingColumn::Feb18Morning))
            .on_up(morph("geo181320", &["mariinka"]))
            .on_up(Action::Hide {
                after: "2014-01-23 14:00:00",
            }),
        Section::new("six", 150.0)
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutLines)
            .then(Action::Filter(MapLayer::Fights, LayerFilter::TimeAtMost(1140)))
            .then(reveal("2014-02-18 10:00:00", "2014-02-18 12:10:00", true))
            .then(Action::ShowBuildings(BuildingColumn::RegionsOffice))
            .then(morph("geo181140", &["mariinka"])),
        Section::new("seven", 50.0)
            .then(Action::ShowBuildings(BuildingColumn::Feb18Morning))
            .on_down(Action::Hint {
                opacity: 1.0,
                duration_ms: 300.0,
            })
            .on_down(Action::Captions {
                opacity: 1.0,
                duration_ms: 300.0,
            })
            .on_down(Action::PlayVideo(MARIINKA_START))
            .on_down(Action::After {
                delay_ms: 7000.0,
                actions: vec![Action::Hint {
                    opacity: 0.0,
                    duration_ms: 3000.0,
                }],
            })
            .on_up(Action::StopVideo)
            .on_up(Action::Hint {
                opacity: 0.0,
                duration_ms: 300.0,
            })
            .on_up(Action::Captions {
                opacity: 0.0,
                duration_ms: 300.0,
            }),
        Section::new("eight", 250.0)
            .on_down(Action::StopVideo)
            .on_down(Action::Hint {
                opacity: 0.0,
                duration_ms: 300.0,
            })
            .on_up(Action::PlayVideo(MARIINKA_START)),
        Section::new("nine", 250.0)
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutLines)
            .then(morph("geo181320", &["maidan", "mariinka"]))
            .then(attack("#650149", &["lypska", "oplot"]))
            .then(popup(30.543557, 50.443881, "атака Оплоту"))
            .then(popup(30.534039, 50.443346, "наступ «беркутівців»"))
            .then(popup(30.534708, 50.445689, "атака «беркутівців»"))
            .then(fights(&[1012, 1140])),
        Section::new("ten", 250.0)
            .then(morph("geo181340", &["maidan", "mariinka"]))
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutShape("oplot"))
            .then(attack("#650149", &["pidkriplennia"]))
            .then(popup(30.535995, 50.444863, "розділена колона мітингувальників")),
        Section::new("eleven", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 12:10:01", "2014-02-18 14:00:00", true))
            .then(fights(&[1012, 1400])),
        Section::new("twelve", 150.0)
            .then(Action::FadeOutPopups)
            .then(morph("geo181415", &["mariinka"]))
            .then(attack("#650149", &["mariinka-titushky", "mariinka-vv"]))
            .then(popup(30.541488, 50.445151, "м'ясорубка в Маріїнському парку"))
            .then(fights(&[1012, 1140, 1400, 1410])),
        video_in("thirteen", 50.0, GRUSHEVSKOGO_9),
        Section::new("fourteen", 350.0)
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutLines)
            .then(reveal("2014-02-18 14:00:01", "2014-02-18 14:15:00", true))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(GRUSHEVSKOGO_9)),
        video_in("fifteen", 50.0, GAS_KRIPOSNYI),
        Section::new("sixteen", 350.0)
            .then(reveal("2014-02-18 14:15:01", "2014-02-18 14:30:00", true))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(GAS_KRIPOSNYI)),
        Section::new("seventeen", 150.0)
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutLines)
            .then(morph("geo181505", &["mariinka"]))
            .then(reveal("2014-02-18 14:31:00", "2014-02-18 15:10:00", true))
            .then(fights(&[1012, 1410]))
            .on_up(shape_opacity("mariinka", 0.2, 0.0))
            .on_up(morph("geo181505", &["maidan"])),
        Section::new("eighteen", 250.0)
            .then(Action::FadeOutPopups)
            .then(shape_opacity("mariinka", 0.0, 500.0))
            .then(fights(&[1012]))
            .then(attack("#650149", &["nastup-berkut"]))
            .then(morph("geo181000", &["maidan"]))
            .then(reveal("2014-02-18 15:10:01", "2014-02-18 16:00:00", true))
            .on_up(morph("geo181000", &["berkut"])),
        video_in("nineteen", 10.0, SHOVKOVYCHNA),
        video_out("twenty", 350.0, SHOVKOVYCHNA),
        Section::new("twenty-one", 150.0)
            .then(Action::FadeOutPopups)
            .then(Action::FadeOutLines)
            .then(morph("geo181610", TWO_CAMPS))
            .then(Action::BarricadeData("data/lines_181610.geojson"))
            .then(popup(30.521186, 50.446151, "майданівці займають КМДА"))
            .then(Action::ShowBuildings(BuildingColumn::Feb18Evening))
            .then(popup(30.528872, 50.447983, "штурм барикади на Інститутській"))
            .then(fights(&[1610])),
        Section::new("twenty-two", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 16:00:01", "2014-02-18 16:15:00", false))
            .then(popup(30.5289244, 50.4480053, "Дворянець, Хурція")),
        Section::new("twenty-three", 150.0)
            .then(Action::FadeOutPopups)
            .then(fights(&[2100]))
            .then(morph("geo181630", TWO_CAMPS))
            .then(Action::ShowBuildings(BuildingColumn::Feb18Night))
            .then(Action::BarricadeData("data/lines_181920.json")),
        Section::new("twenty-four", 50.0)
            .then(morph("geo181645", TWO_CAMPS))
            .then(Action::BarricadeData("data/lines_182324.geojson")),
        Section::new("twenty-five", 50.0)
            .then(morph("geo181645", TWO_CAMPS))
            .then(reveal("2014-02-18 16:15:01", "2014-02-18 17:20:00", false))
            .then(popup(30.5258614, 50.4514723, "Третяк, Теплюк")),
        Section::new("twenty-six", 50.0)
            .then(morph("geo181645", TWO_CAMPS))
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 17:20:01", "2014-02-18 19:00:00", true)),
        video_in("twenty-seven", 100.0, BTRS).on_up(Action::Fly(FlyTarget::Home)),
        video_out("twenty-eight", 350.0, BTRS)
            .then(reveal("2014-02-18 19:00:01", "2014-02-18 19:59:00", false))
            .then(popup(30.52468283519492, 50.450512220079837, "Бондарев, Плеханов"))
            .then(popup(30.5243795, 50.450093, "Брезденюк")),
        Section::new("twenty-nine", 350.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 20:00:00", "2014-02-18 20:10:00", true))
            .then(Action::Fly(UNIONS_VIEW)),
    ];

    for (id, from, to) in [
        ("thirty", "2014-02-18 20:10:01", "2014-02-18 21:30:00"),
        ("thirty-one", "2014-02-18 21:30:01", "2014-02-18 22:00:00"),
        ("thirty-two", "2014-02-18 22:00:01", "2014-02-18 22:30:00"),
    ] {
        s.push(
            Section::new(id, 50.0)
                .then(Action::FadeOutPopups)
                .then(reveal(from, to, true)),
        );
    }

    s.extend([
        Section::new("thirty-three", 50.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 22:30:01", "2014-02-18 23:00:00", false))
            .then(popup(30.5247509, 50.4505398, "Кульчицький, Швець, Бойків")),
        video_in("thirty-four", 100.0, ANTHEM),
        video_out("thirty-five", 350.0, ANTHEM)
            .then(reveal("2014-02-18 23:00:01", "2014-02-18 23:50:00", true)),
        Section::new("thirty-six", 100.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 23:50:01", "2014-02-18 23:55:00", true)),
        Section::new("thirty-seven", 100.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-18 23:55:01", "2014-02-19 00:15:00", true))
            .then(popup(30.524533, 50.450460, "пожежа у Будинку профспілок"))
            .then(fights(&[2100, 190100])),
        Section::new("thirty-eight", 100.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-19 00:15:01", "2014-02-19 00:45:00", true)),
        video_in("thirty-nine", 100.0, UNIONS_FIRE),
        video_out("forty", 350.0, UNIONS_FIRE)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-19 00:45:01", "2014-02-19 01:00:00", true)),
        Section::new("forty-one", 350.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-19 01:00:01", "2014-02-19 02:10:00", false))
            .then(popup(30.524320854186136, 50.450851057984273, "Цвігун, Топій, Клітинський"))
            .on_up(morph("geo181645", TWO_CAMPS))
            .on_up(shape_opacity("church", 0.2, 0.0)),
        Section::new("forty-two", 350.0)
            .then(Action::FadeOutPopups)
            .then(Action::BarricadeData("data/lines_190300.geojson"))
            .then(morph("geo190300", TWO_CAMPS))
            .then(shape_opacity("church", 0.0, 0.0)),
        video_in("forty-three", 10.0, EXPLOSIONS_18),
        video_out("forty-four", 350.0, EXPLOSIONS_18),
        Section::new("forty-five", 250.0)
            .on_up(Action::FadeOutPopups)
            .on_up(Action::ShowBuildings(BuildingColumn::Feb18Night)),
        Section::new("forty-six", 50.0)
            .on_down(Action::PlayVideo(DAY_19))
            .on_up(Action::StopVideo)
            .on_up(Action::FadeOutPopups)
            .on_up(morph("geo190300", TWO_CAMPS))
            .then(Action::ShowBuildings(BuildingColumn::Feb19Afternoon)),
        Section::new("forty-seven", 350.0)
            .then(morph("geo191400", &["maidan"]))
            .then(popup(30.525266, 50.447507, "Мітингувальники захопили консерваторію"))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(DAY_19)),
        Section::new("forty-eight", 250.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-19 02:10:01", "2014-02-20 08:00:00", true))
            .on_up(Action::Fly(UNIONS_VIEW)),
        Section::new("forty-nine", 250.0)
            .then(Action::FadeOutPopups)
            .then(fly(LngLat::new(30.523568, 50.449962), 1.1, 10.0, 10.0))
            .then(reveal("2014-02-20 08:00:01", "2014-02-20 08:50:00", true)),
        video_in("fifty", 50.0, EXPLOSION_20),
        Section::new("fifty-one", 350.0)
            .on_down(Action::StopVideo)
            .on_up(morph("geo191400", TWO_CAMPS))
            .on_up(Action::PlayVideo(EXPLOSION_20)),
        Section::new("fifty-two", 250.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 08:50:01", "2014-02-20 08:59:34", false))
            .then(popup(30.526180374466549, 50.449740482901902, "Балюк, Арутюнян"))
            .then(Action::BarricadeData("data/lines_200900.geojson"))
            .then(morph("geo200900", THREE_CAMPS))
            .then(shape_opacity("chorna-rota", 0.0, 0.0)),
        Section::new("fifty-three", 250.0)
            .then(Action::FadeOutPopups)
            .then(shape_opacity("chorna-rota", 0.5, 0.0))
            .then(Action::ShapeStyle {
                id: "chorna-rota",
                fill: "#000000",
                stroke: "#fee391",
            })
            .then(reveal("2014-02-20 08:59:35", "2014-02-20 09:00:37", true))
            .then(popup(30.528248, 50.449275, "Поява чорної роти"))
            .on_up(morph("geo200900", THREE_CAMPS)),
        Section::new("fifty-four", 250.0)
            .then(Action::FadeOutPopups)
            .then(morph("geo200905", THREE_CAMPS))
            .then(reveal("2014-02-20 09:00:38", "2014-02-20 09:05:00", true)),
        Section::new("fifty-five", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:05:01", "2014-02-20 09:07:16", true)),
        video_in("fifty-six", 150.0, RETREAT_20).on_up(morph("geo200905", THREE_CAMPS)),
        video_out("fifty-seven", 350.0, RETREAT_20),
        Section::new("fifty-eight", 250.0)
            .then(morph("geo200910", THREE_CAMPS))
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:07:17", "2014-02-20 09:08:15", true)),
        Section::new("fifty-nine", 250.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:08:16", "2014-02-20 09:08:34", true)),
        Section::new("sixty", 150.0)
            .then(Action::FadeOutPopups)
            .then(morph("geo200910", &["chorna-rota"]))
            .then(reveal("2014-02-20 09:08:35", "2014-02-20 09:11:55", false))
            .then(popup(30.527103533328003, 50.449944021296972, "Коцюба, Братушка")),
        Section::new("sixty-one", 150.0).then(morph("geo200912", &["chorna-rota"])),
        Section::new("sixty-two", 50.0)
            .then(Action::FadeOutPopups)
            .on_down(Action::PlayVideo(INSTYTUTSKA_0913))
            .on_up(Action::StopVideo),
        Section::new("sixty-three", 350.0)
            .then(morph("geo200916", &["chorna-rota"]))
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:11:56", "2014-02-20 09:15:40", true))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(INSTYTUTSKA_0913)),
        Section::new("sixty-four", 150.0)
            .then(Action::FadeOutPopups)
            .then(morph("geo200919", THREE_CAMPS))
            .then(reveal("2014-02-20 09:15:41", "2014-02-20 09:18:08", false))
            .then(popup(30.527153468447487, 50.449888581575465, "Аксенін, Мойсей, Тарасюк")),
        Section::new("sixty-five", 150.0)
            .then(Action::BarricadeData("data/lines_200921.geojson"))
            .then(morph("geo200921", THREE_CAMPS)),
        Section::new("sixty-six", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:18:09", "2014-02-20 09:21:59", true)),
        Section::new("sixty-seven", 150.0)
            .then(Action::FadeOutPopups)
            .on_down(Action::PlayVideo(INSTYTUTSKA_0922))
            .on_up(Action::StopVideo),
        Section::new("sixty-eight", 350.0)
            .then(reveal("2014-02-20 09:22:00", "2014-02-20 09:26:00", true))
            .then(Action::Fly(INSTYTUTSKA_VIEW))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(INSTYTUTSKA_0922)),
        Section::new("sixty-nine", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:26:01", "2014-02-20 09:28:00", false))
            .then(popup(30.528612462947695, 50.448532866121219, "Дзявульський, Кемський, Опанасюк"))
            .on_up(morph("geo200921", THREE_CAMPS)),
        Section::new("seventy", 150.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:28:01", "2014-02-20 09:29:40", true))
            .then(morph("geo200929", THREE_CAMPS)),
        Section::new("seventy-one", 200.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:29:41", "2014-02-20 09:47:11", false))
            .then(popup(30.528949480304266, 50.448046761295394, "Гриневич, Жиловага"))
            .then(popup(
                30.528334370230827,
                50.448306019834526,
                "Ушневич, Жеребний, Варениця, Точин",
            )),
        Section::new("seventy-two", 200.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:47:12", "2014-02-20 09:56:28", false))
            .then(popup(
                30.528439171999914,
                50.448190345594632,
                "Паращук, Ткачук, Зубенко, Пантелєєв, Голоднюк, Гурик, Котляр",
            )),
        Section::new("seventy-three", 10.0)
            .then(Action::FadeOutPopups)
            .then(reveal("2014-02-20 09:56:29", "2014-02-20 11:29:54", false))
            .then(popup(30.526485293253895, 50.449354803550193, "Полянський"))
            .then(popup(30.52885167800893, 50.447952269965796, "Шилінг"))
            .then(popup(
                30.528407731469191,
                50.448185896579758,
                "Паньків, Царьок, Чміленко, Чаплінський",
            ))
            .then(popup(30.529006812684287, 50.44817776032658, "Храпаченко")),
        Section::new("seventy-four", 10.0)
            .then(Action::FadeOutPopups)
            .then(Action::Fly(UNIONS_VIEW))
            .on_down(Action::PlayVideo(INSTYTUTSKA_1001))
            .on_up(Action::StopVideo)
            .on_up(morph("geo200929", TWO_CAMPS))
            .on_up(Action::BarricadeData("data/lines_200921.geojson"))
            .on_up(shape_opacity("chorna-rota", 0.8, 0.0))
            .on_up(Action::Fly(INSTYTUTSKA_VIEW)),
        Section::new("seventy-five", 350.0)
            .then(Action::FadeOutPopups)
            .then(shape_opacity("chorna-rota", 0.0, 0.0))
            .then(reveal("2014-02-20 11:29:55", "2014-02-20 16:57:55", true))
            .on_down(Action::StopVideo)
            .on_up(Action::PlayVideo(INSTYTUTSKA_1001)),
        Section::new("seventy-six", 350.0)
            .then(Action::BarricadeData("data/lines_201610.geojson"))
            .then(morph("geo201610", TWO_CAMPS)),
        Section::new("seventy-seven", 150.0).then(Action::FadeOutPopups),
    ]);

    let mut finale = Section::new("seventy-eight", 50.0)
        .then(fly(LngLat::new(30.527048, 50.448768), 1.12, 60.0, 0.0))
        .on_down(Action::FadeOutPopups);
    for id in FINALE_SHAPES {
        finale = finale.on_down(shape_opacity(id, 0.0, 2500.0));
    }
    finale = finale
        .on_down(Action::Legend {
            opacity: 0.0,
            duration_ms: 2500.0,
        })
        .on_down(opacity(MapLayer::Buildings, 0.0))
        .on_down(opacity(MapLayer::Barricade, 0.0))
        .on_down(opacity(MapLayer::Fights, 0.0))
        .on_down(Action::MarkersFinale);
    for id in FINALE_SHAPES {
        finale = finale.on_up(shape_opacity(id, 0.2, 2500.0));
    }
    finale = finale
        .on_up(Action::Legend {
            opacity: 1.0,
            duration_ms: 2500.0,
        })
        .on_up(opacity(MapLayer::Buildings, 0.3))
        .on_up(opacity(MapLayer::Barricade, 0.8))
        .on_up(opacity(MapLayer::Fights, 1.0))
        .on_up(Action::MarkersRestore);
    s.push(finale);

    s.push(
        Section::new("disclaimer", 350.0)
            .on_down(Action::MapOpacity {
                opacity: 0.15,
                duration_ms: 200.0,
            })
            .on_up(Action::MapOpacity {
                opacity: 1.0,
                duration_ms: 200.0,
            }),
    );

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::Guard;
    use crate::models::{parse_time, Direction};

    #[test]
    fn test_every_section_numbered() {
        let s = sections();
        // one..seventy-eight plus the disclaimer
        assert_eq!(s.len(), 79);
        assert_eq!(s[0].id, "one");
        assert_eq!(s[77].id, "seventy-eight");
        assert_eq!(s[78].id, "disclaimer");
    }

    #[test]
    fn test_reveal_times_parse() {
        for section in sections() {
            for step in &section.steps {
                match &step.action {
                    Action::Reveal { from, to, .. } => {
                        let from = parse_time(from).unwrap();
                        let to = parse_time(to).unwrap();
                        assert!(from <= to, "{}", section.id);
                    }
                    Action::Hide { after } => assert!(parse_time(after).is_ok()),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_video_sections_pair_up() {
        let s = sections();
        let thirteen = s.iter().find(|x| x.id == "thirteen").unwrap();
        let down: Vec<_> = thirteen.steps_for(Direction::Down).collect();
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].action, Action::PlayVideo(GRUSHEVSKOGO_9));
        assert!(GRUSHEVSKOGO_9.src.ends_with("/grushevskogo9.mp4"));
        assert_eq!(GRUSHEVSKOGO_9.thumbnail, "img/minimap-grushevskogo9.png");
    }

    #[test]
    fn test_popups_inside_kyiv() {
        for section in sections() {
            for step in &section.steps {
                if let Action::Popup { at, .. } = step.action {
                    assert!((30.4..30.6).contains(&at.lon), "{}", section.id);
                    assert!((50.4..50.5).contains(&at.lat), "{}", section.id);
                }
            }
        }
    }

    #[test]
    fn test_three_schedules_delayed_attack() {
        let s = sections();
        let three = s.iter().find(|x| x.id == "three").unwrap();
        assert!(three
            .steps
            .iter()
            .any(|st| st.guard == Guard::Down && matches!(st.action, Action::After { delay_ms, .. } if delay_ms == 2000.0)));
    }
}
