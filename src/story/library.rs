//! The story shelf. Stories are played in order, one per unlock.

use super::{
    CatchItem, Choice, ChoiceOption, DropZone, Interaction, InteractionKind, Page, SortItem, Story, TapTarget,
};
use crate::geometry::{Point, Rect};

const fn target(id: u32, emoji: &'static str, x: f64, y: f64) -> TapTarget {
    TapTarget { id, emoji, pos: Point::new(x, y), correct: false }
}

const fn answer(id: u32, emoji: &'static str, x: f64, y: f64) -> TapTarget {
    TapTarget { id, emoji, pos: Point::new(x, y), correct: true }
}

const fn zone(id: u32, name: &'static str, emoji: &'static str, x: f64, y: f64, w: f64, h: f64) -> DropZone {
    DropZone { id, name, emoji, rect: Rect::new(x, y, w, h) }
}

const fn sortable(id: u32, emoji: &'static str, zone: u32, x: f64, y: f64) -> SortItem {
    SortItem { id, emoji, zone, start: Point::new(x, y) }
}

const fn interactive(image: &'static str, text: &'static str, prompt: &'static str, kind: InteractionKind) -> Page {
    Page { image, text, interaction: Some(Interaction { prompt, kind }), choice: None }
}

const fn reflective(image: &'static str, text: &'static str, prompt: &'static str, options: &'static [ChoiceOption]) -> Page {
    Page { image, text, interaction: None, choice: Some(Choice { prompt, options }) }
}

const fn option(text: &'static str, response: &'static str) -> ChoiceOption {
    ChoiceOption { text, response }
}

const THREE_BINS: [DropZone; 3] = [
    zone(1, "Recycle", "♻️", 5.0, 70.0, 25.0, 25.0),
    zone(2, "Compost", "🌿", 37.0, 70.0, 25.0, 25.0),
    zone(3, "Paper", "📄", 70.0, 70.0, 25.0, 25.0),
];

const RIVER_BINS: [DropZone; 2] = [
    zone(1, "Recycling", "♻️", 10.0, 80.0, 35.0, 18.0),
    zone(2, "Compost", "🌱", 55.0, 80.0, 35.0, 18.0),
];

const VILLAGE_BINS: [DropZone; 3] = [
    zone(1, "Energy", "⚡", 5.0, 70.0, 25.0, 25.0),
    zone(2, "Garden", "🌱", 37.0, 70.0, 25.0, 25.0),
    zone(3, "Reuse", "🎨", 70.0, 70.0, 25.0, 25.0),
];

pub static STORIES: [Story; 10] = [
    Story {
        title: "Sammy the Squirrel's Snack Attack",
        character: "🐿️",
        pages: &[
            Page::plain("🌳", "In a big, beautiful forest lived a squirrel named Sammy. He loved acorns, but today he found something new..."),
            Page::plain("🍫", "A hiker left a shiny wrapper! 'Ooh, a crinkly treasure!' he chattered. But nearby, other pieces of litter dotted the forest floor."),
            interactive(
                "🧹",
                "The forest floor is our home, and it's looking a bit messy. Can you help Sammy clean it up?",
                "Tap all the litter to clean the forest!",
                InteractionKind::TapCollect {
                    targets: &[target(1, "🥤", 20.0, 50.0), target(2, "🍫", 70.0, 60.0), target(3, "🛍️", 45.0, 75.0)],
                },
            ),
            Page::plain("🦉", "Wise old Owl hooted, 'Well done, little one! A clean home is a happy home for everyone, from the tiniest beetle to the biggest bear.'"),
            reflective(
                "✨",
                "Sammy felt proud! He learned that keeping the forest clean helps all his friends. Moral: A clean home is a happy home.",
                "What would you do with a wrapper at the park?",
                &[
                    option("Put it in a bin 🗑️", "Yes! The park stays clean for every squirrel and kid."),
                    option("Take it home 🎒", "Great thinking! Carrying it home until you find a bin works too."),
                ],
            ),
        ],
    },
    Story {
        title: "Lily the Otter's Sparkling Stream",
        character: "🦦",
        pages: &[
            Page::plain("🏞️", "Lily the otter loved to slide down the muddy banks of her river. But one morning, the water looked gloomy and full of trash."),
            Page::plain("😢", "More and more trash floated by! 'This is too much for one otter!' she cried. Can you help Lily sort the trash before it flows away?"),
            interactive(
                "🌊",
                "Help Lily sort the trash!",
                "Drag the floating trash into the correct bins!",
                InteractionKind::CatchAndSort {
                    spawns: &[
                        CatchItem { emoji: "🍾", zone: 1 },
                        CatchItem { emoji: "🛍️", zone: 1 },
                        CatchItem { emoji: "🥤", zone: 1 },
                        CatchItem { emoji: "🍎", zone: 2 },
                        CatchItem { emoji: "🌿", zone: 2 },
                    ],
                    zones: &RIVER_BINS,
                    total: 6,
                },
            ),
            Page::plain("🤝", "Wow! With your help, the river is clean again. Ferdinand the Frog cheered, 'You're a river hero!'"),
            Page::plain("💙", "The river sparkled brightly. Lily did a happy flip in the water. Moral: Teamwork can solve even big problems."),
        ],
    },
    Story {
        title: "Pip the Sparrow and the Lost Ladybug",
        character: "🐦",
        pages: &[
            Page::plain("🐞", "A tiny ladybug named Lucy woke up on a big green leaf, far from her family. 'Oh dear, I'm lost!' she whispered, her voice trembling."),
            Page::plain("🐦", "Pip the sparrow was practicing his loop-de-loops when he saw the sad little ladybug. He flew down. 'What's wrong, little friend?'"),
            interactive(
                "👀",
                "Pip soared into the air to get a bird's-eye view of the garden below. It was a sea of colors! Can you help him spot Lucy's family?",
                "Find the patch of red roses!",
                InteractionKind::TapCollect {
                    targets: &[
                        answer(1, "🌹", 65.0, 70.0),
                        target(2, "🌻", 20.0, 55.0),
                        target(3, "🌷", 70.0, 20.0),
                        target(4, "🌸", 15.0, 25.0),
                        target(5, "🌼", 40.0, 45.0),
                    ],
                },
            ),
            Page::plain("🌹", "From the sky, Pip spotted a big, beautiful patch of red roses! He swooped down and guided Lucy all the way there."),
            Page::plain("🥰", "Lucy's family cheered! Pip learned that using your unique talents to help others is a wonderful feeling. Moral: A little kindness can make a very big difference."),
        ],
    },
    Story {
        title: "The Tin Can Trio's New Job",
        character: "🥫",
        pages: &[
            Page::plain("🗑️", "Three empty tin cans sat in a recycling bin. 'Our job is over,' sighed one. 'We held yummy beans, but now what?'"),
            Page::plain("🚚", "Suddenly, a big truck whisked them away on an adventure to a magical place called the 'Recycling Center'!"),
            interactive(
                "✨",
                "A friendly machine needs your help to sort everything! Drag each item to the correct bin.",
                "Drag the items to the right bins!",
                InteractionKind::Sort {
                    items: &[
                        sortable(1, "🥫", 1, 20.0, 20.0),
                        sortable(2, "🍎", 2, 45.0, 25.0),
                        sortable(3, "📰", 3, 70.0, 20.0),
                    ],
                    zones: &THREE_BINS,
                },
            ),
            Page::plain("🚲", "The cans were melted down and reformed into a shiny new bicycle for a child to ride! They weren't trash; they were treasure!"),
            Page::plain("♻️", "They had a new, exciting job. Moral: Old things can have amazing new beginnings when we recycle."),
        ],
    },
    Story {
        title: "Flutter's Big Adventure",
        character: "🦋",
        pages: &[
            Page::plain("🐛", "Flutter began as a tiny caterpillar, dreaming of flying. After a long nap in a cozy chrysalis, she woke up with beautiful wings!"),
            Page::plain("🦋", "On her first flight, she felt a very important job stirring inside her. She needed to help the flowers."),
            interactive(
                "🌸",
                "Flutter learned she could help flowers create seeds by sharing pollen. This is called pollination!",
                "Tap the flowers to help Flutter pollinate them!",
                InteractionKind::TapCollect {
                    targets: &[target(1, "🌸", 15.0, 50.0), target(2, "🌷", 45.0, 65.0), target(3, "🌻", 75.0, 55.0)],
                },
            ),
            Page::plain("🗺️", "As she visited each flower, a little bit of magic sparkle was left behind. The whole garden looked brighter because of her work!"),
            Page::plain("❤️", "She learned that even a small creature can play a big part in helping the world grow. Moral: Every journey, big or small, has a purpose."),
        ],
    },
    Story {
        title: "Rosie the Rose's Droopy Day",
        character: "🌹",
        pages: &[
            Page::plain("🥀", "Rosie the rose bush felt tired and droopy. The sun was very hot, and her leaves were so thirsty."),
            Page::plain("☀️", "A little girl named Maya saw how sad Rosie looked. 'You need a drink!' she said kindly."),
            interactive(
                "💧",
                "Maya found her little blue watering can. It was time to give Rosie the water she desperately needed.",
                "Drag the watering can to Rosie!",
                InteractionKind::DragDrop {
                    emoji: "💧",
                    start: Point::new(10.0, 60.0),
                    zone: zone(1, "Rosie", "🥀", 60.0, 50.0, 30.0, 40.0),
                },
            ),
            Page::plain("😊", "As the cool water soaked her roots, Rosie's leaves perked up and her petals felt strong again. She looked brighter than ever!"),
            reflective(
                "🌱",
                "Maya learned that plants are living things that need care, just like us. Moral: A little care can bring something beautiful back to life.",
                "How can you help a thirsty plant?",
                &[
                    option("Give it water 💧", "Plants drink through their roots. A little water each day keeps them happy."),
                    option("Move it to the shade ⛱️", "Good idea! On very hot days some shade helps plants rest."),
                ],
            ),
        ],
    },
    Story {
        title: "Twinkle the Star Wants to Shine",
        character: "⭐",
        pages: &[
            Page::plain("🌃", "High in the sky lived a little star named Twinkle. She loved to sparkle for the world below."),
            Page::plain("🏙️", "But the city below was so bright with unneeded lights that it was hard for anyone to see her. This is called light pollution."),
            interactive(
                "💡",
                "The stars need the dark to be seen. Can you help turn off the lights that nobody is using?",
                "Tap the bright lights to dim them!",
                InteractionKind::TapCollect {
                    targets: &[target(1, "💡", 20.0, 70.0), target(2, "💡", 50.0, 80.0), target(3, "💡", 80.0, 75.0)],
                },
            ),
            Page::plain("🏕️", "With some of the city lights dimmed, the sky grew darker. A family camping nearby looked up and gasped. 'Look at all the stars!'"),
            Page::plain("✨", "Twinkle sparkled with joy! She learned that darkness is important, too. Moral: Sometimes, we need to turn off our lights to see true beauty."),
        ],
    },
    Story {
        title: "A Visit to Sunny Meadow",
        character: "🏡",
        pages: &[
            Page::plain("🗺️", "Leo visited a special place called Sunny Meadow Village. Instead of cars, people rode bikes, and old boots were used as flowerpots!"),
            Page::plain("🥕", "They grew food in a shared garden and traded old toys instead of buying new ones. 'We believe in using things wisely,' a villager explained."),
            interactive(
                "♻️",
                "A villager smiled. 'Our secret is that everything has a special place!' Can you help Leo sort these items the Sunny Meadow way?",
                "Drag the items to the right bins!",
                InteractionKind::Sort {
                    items: &[
                        sortable(1, "☀️", 1, 20.0, 20.0),
                        sortable(2, "🥕", 2, 45.0, 25.0),
                        sortable(3, "👢", 3, 70.0, 20.0),
                    ],
                    zones: &VILLAGE_BINS,
                },
            ),
            Page::plain("♻️", "Leo saw a clever water wheel powering lights and a market where kids traded toys. 'Our secret is helping each other and the Earth,' they said."),
            Page::plain("💡", "Leo went home full of ideas, realizing that being eco-friendly is about being creative and kind. Moral: We can build a better world by being smart and sharing."),
        ],
    },
    Story {
        title: "The Sky's Helpful Children",
        character: "🌬️",
        pages: &[
            Page::plain("🍃", "A little seed needed to fly from its mother tree to find a place to grow. 'I wish I could see the world!' it sighed."),
            Page::plain("🌬️", "A gentle voice whispered, 'I can help!' It was Gale, the wind spirit. With a soft puff, she lifted the seed into the air."),
            interactive(
                "🌱",
                "Now the seed is flying! It needs to find a nice, sunny patch of soil to land in so it can grow big and strong.",
                "Help the wind guide the seed to the sunny spot!",
                InteractionKind::DragDrop {
                    emoji: "🍃",
                    start: Point::new(10.0, 20.0),
                    zone: zone(1, "Sunny spot", "☀️", 65.0, 70.0, 25.0, 20.0),
                },
            ),
            Page::plain("💧", "The seed landed safely. 'Now I'm thirsty,' it worried. Just then, Drizzle, the rain spirit, arrived to give it a gentle drink."),
            Page::plain("🌍", "The seed learned that nature's helpers work together to make the world grow. Moral: The wind and rain are our friends, helping life thrive."),
        ],
    },
    Story {
        title: "Mother Earth's Quiet Day",
        character: "🌍",
        pages: &[
            Page::plain("😴", "Mother Earth felt tired. The world was always so busy and noisy. 'I need a little rest,' she yawned to the clouds."),
            Page::plain("🤫", "A child named Chloe noticed how peaceful it was. The birds were singing softly, and the air felt calm. But some things were still making noise."),
            interactive(
                "🎧",
                "Even the Earth needs peace and quiet to feel healthy. Can you help make the world a little quieter for her?",
                "Tap the noisy things to make them quiet.",
                InteractionKind::TapCollect {
                    targets: &[target(1, "📢", 15.0, 60.0), target(2, "🥁", 75.0, 65.0), target(3, "💥", 45.0, 75.0)],
                },
            ),
            Page::plain("✨", "As the world grew quiet, Mother Earth took a deep, refreshing breath. The quiet day helped her recharge her magic."),
            reflective(
                "💖",
                "Chloe learned that everyone, even the whole planet, needs a rest day. Moral: Quiet moments help us and our world heal and feel strong.",
                "What is a quiet thing you can do today?",
                &[
                    option("Read a book 📚", "Lovely! Books are quiet adventures."),
                    option("Listen to the birds 🐦", "Shh... nature has its own music when we listen."),
                    option("Turn off the TV 📺", "The Earth says thank you for saving energy!"),
                ],
            ),
        ],
    },
];
